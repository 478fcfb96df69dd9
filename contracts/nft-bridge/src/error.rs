use cosmwasm_std::StdError;
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

    #[error("No trusted path to destination chain {chain_id}")]
    UntrustedDestination { chain_id: u32 },

    #[error("Empty batch")]
    EmptyBatch {},

    #[error("Batch of {got} ids exceeds destination limit {limit}")]
    BatchTooLarge { limit: u32, got: u32 },

    #[error("Batch size limit must be at least 1")]
    InvalidBatchLimit {},

    #[error("Sender does not own token {token_id}")]
    NotTokenOwner { token_id: u64 },

    #[error("No credits stored")]
    NoCreditsStored {},
}

/// Application failures inside the channel handler become the stored
/// payload instead of aborting the delivery.
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
