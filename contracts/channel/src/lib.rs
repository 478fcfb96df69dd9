pub mod contract;
mod error;
pub mod state;

pub use crate::contract::{
    expected_nonce, query_expected_nonce, query_has_stored_payload, query_queue_length,
    query_stored_payload, try_force_resume, try_receive, try_retry_payload, PacketHandler,
    QUEUE_DRAIN_BUDGET,
};
pub use crate::error::ContractError;
