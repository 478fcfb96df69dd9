use cosmwasm_std::Binary;
use cw_storage_plus::Map;

/// Authenticated counterparty address per remote chain id. At most one
/// remote address is ever configured for a chain id.
pub const TRUSTED_REMOTES: Map<u32, Binary> = Map::new("path_registry_trusted_remotes");
