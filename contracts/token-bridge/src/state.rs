use std::collections::VecDeque;

use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};
use serde::{Deserialize, Serialize};

use common::BridgeMode;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub local_chain_id: u32,
    /// Transport endpoint; the only address allowed to deliver packets
    pub endpoint: Addr,
    /// cw20 token locked or minted by this bridge
    pub token: Addr,
    pub mode: BridgeMode,
    pub local_decimals: u8,
    /// Wire precision common to all connected chains
    pub shared_decimals: u8,
    pub fee_owner: Addr,
    pub default_fee_bp: u16,
}

/// A post-credit notification whose submessage is in flight
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PendingCall {
    pub seq: u64,
    pub src_chain_id: u32,
    pub recipient: Addr,
    pub amount: Uint128,
    pub msg: Binary,
}

/// A notification that failed; the credit it followed is final
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FailedCallRecord {
    pub src_chain_id: u32,
    pub recipient: Addr,
    pub amount: Uint128,
    pub msg: Binary,
    pub reason: String,
}

pub const CONFIG: Item<Config> = Item::new("token_bridge_config");

/// Per-destination fee override in basis points
pub const FEE_BP: Map<u32, u16> = Map::new("token_bridge_fee_bp");

/// Locker-mode conservation counter, local units
pub const LOCKED: Item<Uint128> = Item::new("token_bridge_locked");

/// Minter-mode conservation counter, local units
pub const SUPPLY: Item<Uint128> = Item::new("token_bridge_supply");

pub const NEXT_CALL_SEQ: Item<u64> = Item::new("token_bridge_next_call_seq");

/// Calls awaiting their submessage reply, in dispatch order
pub const PENDING_CALLS: Item<VecDeque<PendingCall>> = Item::new("token_bridge_pending_calls");

pub const FAILED_CALLS: Map<u64, FailedCallRecord> = Map::new("token_bridge_failed_calls");
