pub mod contract;
mod error;
pub mod state;

pub use crate::contract::{
    execute, execute_renounce_ownership, execute_transfer_ownership, instantiate, only_owner,
    query, query_owner,
};
pub use crate::error::ContractError;
