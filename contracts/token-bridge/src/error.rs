use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    OwnableError(#[from] ownable::ContractError),

    #[error("{0}")]
    PathRegistryError(#[from] path_registry::ContractError),

    #[error("{0}")]
    ChannelError(#[from] channel::ContractError),

    #[error("Sender is not the configured endpoint")]
    NotEndpoint {},

    #[error("Sender is not the configured token")]
    UnknownToken {},

    #[error("No trusted path to destination chain {chain_id}")]
    UntrustedDestination { chain_id: u32 },

    #[error("Shared decimals {shared} exceed local decimals {local}")]
    InvalidDecimals { local: u8, shared: u8 },

    #[error("Fee basis points {fee_bp} exceed 10000")]
    InvalidFeeBp { fee_bp: u16 },

    #[error("Amount below minimum: post-fee amount {amount} < min {min_amount_out}")]
    AmountBelowMinimum {
        min_amount_out: Uint128,
        amount: Uint128,
    },

    #[error("Amount does not fit the shared-precision wire width")]
    SharedAmountOverflow {},

    #[error("Amount too small to represent at shared precision")]
    AmountTooSmall {},

    #[error("Insufficient locked balance: locked {locked}, needed {needed}")]
    InsufficientLocked { locked: Uint128, needed: Uint128 },

    #[error("Insufficient minted supply: supply {supply}, needed {needed}")]
    InsufficientSupply { supply: Uint128, needed: Uint128 },

    #[error("Ledger counter overflow")]
    LedgerOverflow {},

    #[error("No failed call with sequence {seq}")]
    NoFailedCall { seq: u64 },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}

/// Application failures inside the channel handler are captured as a
/// stored payload rather than aborting the delivery.
impl From<ContractError> for channel::ContractError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::ChannelError(inner) => inner,
            other => channel::ContractError::Application {
                reason: other.to_string(),
            },
        }
    }
}
