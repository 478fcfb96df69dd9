pub mod contract;
pub mod credits;
mod error;
pub mod state;

pub use crate::contract::{execute, instantiate, query};
pub use crate::error::ContractError;
