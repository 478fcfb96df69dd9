use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

mod packet;
pub use packet::*;

mod contract_msg;
pub use contract_msg::*;

mod utils;
pub use utils::*;

mod traits;
pub use traits::*;

/// Conservation model of a bridge instance.
///
/// A `Locker` holds the canonical asset and tracks the amount currently
/// locked on behalf of remote chains. A `Minter` issues a wrapped
/// representation and tracks the supply it has minted.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BridgeMode {
    Locker,
    Minter,
}

/// One chain's fungible ledger expressed in shared-decimal units.
///
/// Counters only ever move in whole multiples of the decimal conversion
/// rate (dust never crosses chains), so the shared-unit view is exact.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChainLedger {
    pub chain_id: u32,
    pub mode: BridgeMode,
    /// Locked amount in shared units. Zero for minters.
    pub locked: Uint128,
    /// Minted supply in shared units. Zero for lockers.
    pub supply: Uint128,
}

/// Errors raised by the wire codec
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// IO error from Read/Write usage
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Unknown packet type tag: {0}")]
    UnknownPacketType(u8),
}
