//! Off-path consistency checking for the fungible ledger.
//!
//! Each chain answers a read-only `Simulate` query with the ledger it
//! would hold after applying a set of candidate packets. This crate
//! aggregates those per-chain results and verifies the global
//! conservation invariant before anything is acted upon. Everything here
//! is pure; nothing mutates contract state.

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use common::{BridgeMode, ChainLedger};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("insufficient locked balance: locked {locked}, inbound {needed}")]
    InsufficientLocked { locked: Uint128, needed: Uint128 },

    #[error("supply overflow applying inbound amount")]
    SupplyOverflow,
}

/// Recompute a chain's ledger after crediting the given inbound wire
/// amounts (shared units). Sends are not modelled separately: a sender's
/// counters move at send time, so only undelivered credits are in flight.
pub fn apply_inbound(
    mut ledger: ChainLedger,
    inbound: &[u64],
) -> Result<ChainLedger, SimulationError> {
    for &amount in inbound {
        let amount = Uint128::from(amount);
        match ledger.mode {
            BridgeMode::Locker => {
                ledger.locked =
                    ledger
                        .locked
                        .checked_sub(amount)
                        .map_err(|_| SimulationError::InsufficientLocked {
                            locked: ledger.locked,
                            needed: amount,
                        })?;
            }
            BridgeMode::Minter => {
                ledger.supply = ledger
                    .supply
                    .checked_add(amount)
                    .map_err(|_| SimulationError::SupplyOverflow)?;
            }
        }
    }
    Ok(ledger)
}

/// Result of a global consistency check. A violation carries a reason
/// string; nothing in here throws.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CheckOutcome {
    pub ok: bool,
    pub reason: Option<String>,
}

impl CheckOutcome {
    fn pass() -> Self {
        CheckOutcome {
            ok: true,
            reason: None,
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        CheckOutcome {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Verify the conservation invariant over a closed set of per-chain
/// simulation results: at most one chain acts as the lock-and-mint
/// origin, and its locked balance equals the sum of all minted supplies.
/// With no locker in the set (pure burn-and-mint), per-chain supplies
/// carry no cross-chain constraint a snapshot could verify.
pub fn check(results: &[ChainLedger]) -> CheckOutcome {
    for (index, ledger) in results.iter().enumerate() {
        if results[..index]
            .iter()
            .any(|other| other.chain_id == ledger.chain_id)
        {
            return CheckOutcome::fail(format!(
                "duplicate simulation result for chain {}",
                ledger.chain_id
            ));
        }
    }

    let lockers: Vec<&ChainLedger> = results
        .iter()
        .filter(|ledger| ledger.mode == BridgeMode::Locker)
        .collect();
    if lockers.len() > 1 {
        let chains: Vec<String> = lockers
            .iter()
            .map(|ledger| ledger.chain_id.to_string())
            .collect();
        return CheckOutcome::fail(format!(
            "multiple lock-and-mint origins: chains {}",
            chains.join(", ")
        ));
    }

    let mut total_supply = Uint128::zero();
    for ledger in results
        .iter()
        .filter(|ledger| ledger.mode == BridgeMode::Minter)
    {
        total_supply = match total_supply.checked_add(ledger.supply) {
            Ok(sum) => sum,
            Err(_) => return CheckOutcome::fail("minted supply sum overflows"),
        };
    }

    if let Some(locker) = lockers.first() {
        if locker.locked != total_supply {
            return CheckOutcome::fail(format!(
                "conservation violated: chain {} holds {} locked against {} minted remotely",
                locker.chain_id, locker.locked, total_supply
            ));
        }
    }

    CheckOutcome::pass()
}
