use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    PathRegistryError(#[from] path_registry::ContractError),

    #[error("Unexpected nonce from chain {chain_id}: expected {expected}, got {got}")]
    UnexpectedNonce {
        chain_id: u32,
        expected: u64,
        got: u64,
    },

    #[error("No stored payload for chain {chain_id}")]
    NotBlocked { chain_id: u32 },

    #[error("Supplied payload does not match stored payload hash for chain {chain_id}")]
    PayloadHashMismatch { chain_id: u32 },

    #[error("Application failure: {reason}")]
    Application { reason: String },
}
