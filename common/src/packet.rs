use ethers_core::{types::H256, utils::keccak256};
use serde::{Deserialize, Serialize};

use crate::traits::{Decode, Encode};
use crate::CodecError;

pub const PACKET_TYPE_TRANSFER: u8 = 1;
pub const PACKET_TYPE_TRANSFER_WITH_CALL: u8 = 2;
pub const PACKET_TYPE_BATCH_TRANSFER: u8 = 3;

/// An application payload carried between chains.
///
/// The tag byte is decoded exactly once at the delivery boundary and
/// routed from there; the body is fixed-width big-endian fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Packet {
    /// 1 || to (32) || amount (8, shared units)
    Transfer { to: H256, amount: u64 },
    /// 2 || to (32) || amount (8) || call_len (4) || call bytes
    TransferWithCall {
        to: H256,
        amount: u64,
        call: Vec<u8>,
    },
    /// 3 || to (32) || count (4) || count x token_id (8)
    BatchTransfer { to: H256, token_ids: Vec<u64> },
}

impl Packet {
    /// Hash of the canonical encoding
    pub fn payload_hash(&self) -> H256 {
        keccak256(self.to_vec()).into()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Packet::Transfer { .. } => "transfer",
            Packet::TransferWithCall { .. } => "transfer_with_call",
            Packet::BatchTransfer { .. } => "batch_transfer",
        }
    }
}

impl Encode for Packet {
    fn write_to<W>(&self, writer: &mut W) -> std::io::Result<usize>
    where
        W: std::io::Write,
    {
        match self {
            Packet::Transfer { to, amount } => {
                writer.write_all(&[PACKET_TYPE_TRANSFER])?;
                writer.write_all(to.as_ref())?;
                writer.write_all(&amount.to_be_bytes())?;
                Ok(1 + 32 + 8)
            }
            Packet::TransferWithCall { to, amount, call } => {
                writer.write_all(&[PACKET_TYPE_TRANSFER_WITH_CALL])?;
                writer.write_all(to.as_ref())?;
                writer.write_all(&amount.to_be_bytes())?;
                writer.write_all(&(call.len() as u32).to_be_bytes())?;
                writer.write_all(call)?;
                Ok(1 + 32 + 8 + 4 + call.len())
            }
            Packet::BatchTransfer { to, token_ids } => {
                writer.write_all(&[PACKET_TYPE_BATCH_TRANSFER])?;
                writer.write_all(to.as_ref())?;
                writer.write_all(&(token_ids.len() as u32).to_be_bytes())?;
                for id in token_ids {
                    writer.write_all(&id.to_be_bytes())?;
                }
                Ok(1 + 32 + 4 + 8 * token_ids.len())
            }
        }
    }
}

impl Decode for Packet {
    fn read_from<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: std::io::Read,
    {
        let mut tag = [0u8; 1];
        reader.read_exact(&mut tag)?;

        let mut to = [0u8; 32];
        reader.read_exact(to.as_mut())?;
        let to = H256::from(to);

        match tag[0] {
            PACKET_TYPE_TRANSFER => {
                let mut amount = [0u8; 8];
                reader.read_exact(&mut amount)?;
                Ok(Packet::Transfer {
                    to,
                    amount: u64::from_be_bytes(amount),
                })
            }
            PACKET_TYPE_TRANSFER_WITH_CALL => {
                let mut amount = [0u8; 8];
                reader.read_exact(&mut amount)?;

                let mut call_len = [0u8; 4];
                reader.read_exact(&mut call_len)?;

                // length-check against the actual remainder before
                // trusting the declared length with an allocation
                let mut call = vec![];
                reader.read_to_end(&mut call)?;
                if call.len() != u32::from_be_bytes(call_len) as usize {
                    return Err(truncated("call bytes"));
                }

                Ok(Packet::TransferWithCall {
                    to,
                    amount: u64::from_be_bytes(amount),
                    call,
                })
            }
            PACKET_TYPE_BATCH_TRANSFER => {
                let mut count = [0u8; 4];
                reader.read_exact(&mut count)?;

                let mut body = vec![];
                reader.read_to_end(&mut body)?;
                if body.len() != u32::from_be_bytes(count) as usize * 8 {
                    return Err(truncated("token id list"));
                }

                let token_ids = body
                    .chunks_exact(8)
                    .map(|chunk| u64::from_be_bytes(chunk.try_into().expect("!chunk")))
                    .collect();

                Ok(Packet::BatchTransfer { to, token_ids })
            }
            unknown => Err(CodecError::UnknownPacketType(unknown)),
        }
    }
}

fn truncated(what: &str) -> CodecError {
    CodecError::IoError(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("truncated {}", what),
    ))
}

impl std::fmt::Display for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Packet::Transfer { to, amount } => write!(f, "Transfer {:?} amount {}", to, amount),
            Packet::TransferWithCall { to, amount, call } => {
                write!(
                    f,
                    "TransferWithCall {:?} amount {} call {} bytes",
                    to,
                    amount,
                    call.len()
                )
            }
            Packet::BatchTransfer { to, token_ids } => {
                write!(f, "BatchTransfer {:?} of {} ids", to, token_ids.len())
            }
        }
    }
}
