//! Integer fee, dust and shared-decimal arithmetic.
//!
//! All computation truncates toward zero. The fee comes off the gross
//! amount first and the dust off the post-fee remainder, so
//! `fee + dust + net == amount` holds exactly for every input and the
//! net amount is always a whole multiple of the conversion rate.

use cosmwasm_std::Uint128;

use crate::error::ContractError;

pub const BPS_DENOMINATOR: u128 = 10_000;
pub const MAX_FEE_BP: u16 = 10_000;

#[derive(Debug, PartialEq)]
pub struct SendBreakdown {
    /// Collected for the fee owner on the sending chain, local units
    pub fee: Uint128,
    /// Refunded to the sender on the sending chain, local units
    pub dust: Uint128,
    /// Locked or burned locally, local units; equals `wire_amount * rate`
    pub net: Uint128,
    /// Amount crossing the wire, shared units
    pub wire_amount: u64,
}

/// Scale factor between local and shared precision
pub fn conversion_rate(local_decimals: u8, shared_decimals: u8) -> Uint128 {
    Uint128::from(10u128.pow(u32::from(local_decimals - shared_decimals)))
}

pub fn break_down_send(
    amount: Uint128,
    fee_bp: u16,
    rate: Uint128,
) -> Result<SendBreakdown, ContractError> {
    let fee = amount.multiply_ratio(u128::from(fee_bp), BPS_DENOMINATOR);
    let after_fee = amount - fee;

    let net = (after_fee / rate) * rate;
    let dust = after_fee - net;

    let wire_amount = u64::try_from((net / rate).u128())
        .map_err(|_| ContractError::SharedAmountOverflow {})?;

    Ok(SendBreakdown {
        fee,
        dust,
        net,
        wire_amount,
    })
}

/// Inverse conversion on the receiving side. Lossless: dust was already
/// removed at the source, so the wire amount scales back exactly.
pub fn wire_to_local(wire_amount: u64, rate: Uint128) -> Result<Uint128, ContractError> {
    Uint128::from(wire_amount)
        .checked_mul(rate)
        .map_err(|_| ContractError::SharedAmountOverflow {})
}
