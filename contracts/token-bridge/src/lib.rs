pub mod amounts;
pub mod contract;
mod error;
pub mod state;

pub use crate::contract::{execute, instantiate, query, reply};
pub use crate::error::ContractError;
