use cosmwasm_std::{Binary, Uint128};
use cw20::Cw20ReceiveMsg;
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};

use super::path_registry;
use crate::{BridgeMode, ChainLedger};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub local_chain_id: u32,
    pub endpoint: String,
    /// cw20 token this bridge locks or mints
    pub token: String,
    pub mode: BridgeMode,
    pub local_decimals: u8,
    pub shared_decimals: u8,
    pub fee_owner: String,
    pub default_fee_bp: u16,
}

impl From<InstantiateMsg> for path_registry::InstantiateMsg {
    fn from(_: InstantiateMsg) -> Self {
        path_registry::InstantiateMsg {}
    }
}

/// Inner message of the cw20 receive hook that starts an outbound send.
/// The hook amount is the amount the bridge actually received.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SendMsg {
    pub dst_chain_id: u32,
    pub recipient: H256,
    /// Slippage guard on the post-fee, post-dust amount in local units
    pub min_amount_out: Option<Uint128>,
    /// Optional payload delivered to the recipient contract after credit
    pub call: Option<Binary>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// cw20 receive hook carrying a `SendMsg`
    Receive(Cw20ReceiveMsg),
    /// Inbound delivery callback, endpoint only
    ReceivePacket {
        src_chain_id: u32,
        src_address: Binary,
        nonce: u64,
        payload: Binary,
    },
    RetryPayload {
        src_chain_id: u32,
        src_address: Binary,
        payload: Binary,
    },
    ForceResumeReceive {
        src_chain_id: u32,
        src_address: Binary,
    },
    /// Re-attempt a failed post-credit notification
    RetryCall {
        seq: u64,
    },
    SetTrustedRemote {
        chain_id: u32,
        remote: Binary,
    },
    SetFeeBp {
        chain_id: u32,
        fee_bp: Option<u16>,
    },
    SetDefaultFeeBp {
        fee_bp: u16,
    },
    SetFeeOwner {
        fee_owner: String,
    },
    RenounceOwnership {},
    TransferOwnership {
        new_owner: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Config {},
    Owner {},
    TrustedRemote { chain_id: u32 },
    IsTrustedRemote { chain_id: u32, address: Binary },
    FeeBp { chain_id: u32 },
    Ledger {},
    ExpectedNonce { src_chain_id: u32 },
    HasStoredPayload { src_chain_id: u32 },
    StoredPayload { src_chain_id: u32 },
    QueueLength { src_chain_id: u32 },
    FailedCalls {},
    QuoteFee { dst_chain_id: u32, amount: Uint128 },
    Simulate { payloads: Vec<Binary> },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigResponse {
    pub local_chain_id: u32,
    pub endpoint: String,
    pub token: String,
    pub mode: BridgeMode,
    pub local_decimals: u8,
    pub shared_decimals: u8,
    pub fee_owner: String,
    pub default_fee_bp: u16,
}

/// Conservation counters in local units
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LedgerResponse {
    pub mode: BridgeMode,
    pub locked: Uint128,
    pub supply: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeeBpResponse {
    pub fee_bp: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FailedCall {
    pub seq: u64,
    pub src_chain_id: u32,
    pub recipient: String,
    pub amount: Uint128,
    pub msg: Binary,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FailedCallsResponse {
    pub calls: Vec<FailedCall>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuoteFeeResponse {
    pub native_fee: Uint128,
    pub token_fee: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulateResponse {
    pub ok: bool,
    pub reason: Option<String>,
    /// Would-be ledger in shared units when the simulation is applicable
    pub ledger: Option<ChainLedger>,
}
