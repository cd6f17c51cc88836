//! Errors surfaced by the ledger boundary.

use thiserror::Error;

/// Failures from the ledger collaborator.
///
/// `Unavailable` means the ledger could not be reached at all; `Rejected`
/// means it was reached and refused the operation. The distinction matters
/// to callers: unavailability may be retried, a rejection will not succeed
/// on retry with the same inputs.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("ledger rejected transaction: {0}")]
    Rejected(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },
}
