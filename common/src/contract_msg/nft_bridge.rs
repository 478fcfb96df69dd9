use cosmwasm_std::{Binary, Uint128};
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};

use super::path_registry;
use crate::BridgeMode;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub local_chain_id: u32,
    pub endpoint: String,
    /// cw721 collection this bridge locks or mints
    pub collection: String,
    pub mode: BridgeMode,
    /// Sender-side cap on ids per outbound batch when no per-chain
    /// override is configured
    pub default_batch_limit: u32,
    /// Receiver-side settlement budget per inbound delivery
    pub receive_batch_limit: u32,
}

impl From<InstantiateMsg> for path_registry::InstantiateMsg {
    fn from(_: InstantiateMsg) -> Self {
        path_registry::InstantiateMsg {}
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Single-id convenience wrapper over `SendBatch`
    Send {
        token_id: u64,
        dst_chain_id: u32,
        recipient: H256,
    },
    SendBatch {
        token_ids: Vec<u64>,
        dst_chain_id: u32,
        recipient: H256,
    },
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
    /// Re-attempt the unsettled remainder of a partially delivered batch
    ClearCredits {
        key: H256,
        limit: Option<u32>,
    },
    SetTrustedRemote {
        chain_id: u32,
        remote: Binary,
    },
    SetBatchSizeLimit {
        chain_id: u32,
        limit: Option<u32>,
    },
    SetReceiveBatchLimit {
        limit: u32,
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
    BatchSizeLimit { chain_id: u32 },
    Credits { key: H256 },
    ExpectedNonce { src_chain_id: u32 },
    HasStoredPayload { src_chain_id: u32 },
    StoredPayload { src_chain_id: u32 },
    QueueLength { src_chain_id: u32 },
    QuoteFee { dst_chain_id: u32, token_ids: Vec<u64> },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConfigResponse {
    pub local_chain_id: u32,
    pub endpoint: String,
    pub collection: String,
    pub mode: BridgeMode,
    pub default_batch_limit: u32,
    pub receive_batch_limit: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchSizeLimitResponse {
    pub limit: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreditRecordInfo {
    pub src_chain_id: u32,
    pub recipient: String,
    pub remaining: Vec<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreditsResponse {
    pub record: Option<CreditRecordInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuoteFeeResponse {
    pub native_fee: Uint128,
    pub token_fee: Uint128,
}
