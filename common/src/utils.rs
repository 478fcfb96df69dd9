use cosmwasm_std::{Addr, Api, StdError, StdResult};
use ethers_core::{types::H256, utils::keccak256};

/// Hash raw payload bytes the way stored payloads are fingerprinted
pub fn keccak_hash(data: &[u8]) -> H256 {
    keccak256(data).into()
}

/// Zero-left-pad a local address into the 32-byte wire representation
pub fn addr_to_h256(address: &Addr) -> StdResult<H256> {
    let bytes = address.as_bytes();
    if bytes.len() > 32 {
        return Err(StdError::generic_err(format!(
            "address {} longer than 32 bytes",
            address
        )));
    }

    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(H256::from(buf))
}

/// Recover a local address from its 32-byte wire representation by
/// stripping the zero padding
pub fn h256_to_addr(api: &dyn Api, value: &H256) -> StdResult<Addr> {
    let bytes = value.as_bytes();
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .ok_or_else(|| StdError::generic_err("empty wire address"))?;

    let string = String::from_utf8(bytes[start..].to_vec())
        .map_err(|_| StdError::generic_err("wire address is not utf-8"))?;
    api.addr_validate(&string)
}
