use crate::validate::InvalidReason;
use tcr_ledger::LedgerError;
use tcr_types::{DomainName, DomainStage};
use thiserror::Error;

/// Failures of the application submission path.
///
/// Every variant leaves registry state unchanged: no partial stake is ever
/// locked, so retrying after a failure is always safe.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{0}")]
    Validation(InvalidReason),

    #[error("domain {domain} is mid-lifecycle (stage {stage}), cannot re-apply")]
    StageConflict {
        domain: DomainName,
        stage: DomainStage,
    },

    #[error("insufficient funds to stake: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
