pub mod channel;
pub mod endpoint;
pub mod nft_bridge;
pub mod ownable;
pub mod path_registry;
pub mod receiver;
pub mod token_bridge;
