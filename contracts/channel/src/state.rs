use std::collections::VecDeque;

use cosmwasm_std::Binary;
use cw_storage_plus::Map;
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};

/// A blocked inbound message held for retry. At most one exists per path;
/// while it exists the path is Blocked and later nonces queue behind it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredPayload {
    pub nonce: u64,
    pub payload_hash: H256,
    pub payload: Binary,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QueuedDelivery {
    pub nonce: u64,
    pub payload: Binary,
}

/// Next nonce the channel will admit per source chain. Defaults to 1.
pub const NEXT_NONCE: Map<u32, u64> = Map::new("channel_next_nonce");

pub const STORED_PAYLOADS: Map<u32, StoredPayload> = Map::new("channel_stored_payloads");

/// Arrival-ordered deliveries waiting behind a stored payload
pub const QUEUES: Map<u32, VecDeque<QueuedDelivery>> = Map::new("channel_queues");
