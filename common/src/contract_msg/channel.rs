use cosmwasm_std::Binary;
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExpectedNonceResponse {
    pub expected_nonce: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HasStoredPayloadResponse {
    pub has_stored_payload: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredPayloadInfo {
    pub nonce: u64,
    pub payload_hash: H256,
    pub payload: Binary,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredPayloadResponse {
    pub stored: Option<StoredPayloadInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QueueLengthResponse {
    pub length: usize,
}
