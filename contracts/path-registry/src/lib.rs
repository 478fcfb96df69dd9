pub mod contract;
mod error;
pub mod state;

pub use crate::contract::{
    assert_trusted_remote, execute, execute_set_trusted_remote, instantiate, is_trusted_remote,
    query, query_is_trusted_remote, query_trusted_remote, trusted_remote,
};
pub use crate::error::ContractError;
