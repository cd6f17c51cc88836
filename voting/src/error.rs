use tcr_ledger::LedgerError;
use tcr_types::{AccountAddress, DomainName, DomainStage};
use thiserror::Error;

/// Failures of the voting subsystem. None of them alter the tally.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("domain {domain} is in stage {stage}, outside the {expected} window")]
    Phase {
        domain: DomainName,
        stage: DomainStage,
        expected: DomainStage,
    },

    #[error("no commit found for {voter} on {domain}")]
    MissingCommit {
        domain: DomainName,
        voter: AccountAddress,
    },

    #[error("reveal by {voter} on {domain} does not match the stored commitment")]
    CommitMismatch {
        domain: DomainName,
        voter: AccountAddress,
    },

    #[error("insufficient balance to stake vote: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
