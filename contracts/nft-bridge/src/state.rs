use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};
use serde::{Deserialize, Serialize};

use common::BridgeMode;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub local_chain_id: u32,
    /// Transport endpoint; the only address allowed to deliver packets
    pub endpoint: Addr,
    /// cw721 collection locked or minted by this bridge
    pub collection: Addr,
    pub mode: BridgeMode,
    /// Sender-side cap on ids per outbound batch when no per-chain
    /// override is configured
    pub default_batch_limit: u32,
    /// Receiver-side settlement budget per inbound delivery; anything
    /// beyond it is credited for later clearing
    pub receive_batch_limit: u32,
}

/// The unsettled remainder of a batch delivery, keyed by the hash of the
/// original send parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreditRecord {
    pub src_chain_id: u32,
    pub recipient: Addr,
    pub remaining: Vec<u64>,
}

pub const CONFIG: Item<Config> = Item::new("nft_bridge_config");

/// Per-destination batch size override
pub const BATCH_LIMITS: Map<u32, u32> = Map::new("nft_bridge_batch_limits");

/// Keyed by the 32-byte credit key
pub const CREDITS: Map<&[u8], CreditRecord> = Map::new("nft_bridge_credits");

/// Locker mode: ids currently held by the bridge on behalf of remote
/// chains. An id missing here cannot be unlocked.
pub const CUSTODY: Map<u64, bool> = Map::new("nft_bridge_custody");

/// Minter mode: ids this bridge has minted and not yet burned back. An
/// id present here cannot be minted again.
pub const MINTED: Map<u64, bool> = Map::new("nft_bridge_minted");
