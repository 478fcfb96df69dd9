use ethers_core::{types::H256, utils::keccak256};

/// Deterministic key of a batch credit record:
/// `keccak256(src_chain_id_be ++ wire_recipient ++ ids_be...)` over the
/// ORIGINAL full id list, so the key is reconstructible from the send
/// parameters alone.
pub fn credit_key(src_chain_id: u32, to: &H256, token_ids: &[u64]) -> H256 {
    let mut buf = Vec::with_capacity(4 + 32 + 8 * token_ids.len());
    buf.extend_from_slice(&src_chain_id.to_be_bytes());
    buf.extend_from_slice(to.as_bytes());
    for id in token_ids {
        buf.extend_from_slice(&id.to_be_bytes());
    }
    keccak256(buf).into()
}
