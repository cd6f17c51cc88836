use crate::resolver::StatusError;
use thiserror::Error;

/// Aggregated error for the registry facade.
///
/// Each variant keeps the underlying structured error so the UI collaborator
/// can branch on kind while `Display` yields the user-facing message.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Params(#[from] tcr_params::ParamsError),

    #[error(transparent)]
    Apply(#[from] tcr_application::ApplyError),

    #[error(transparent)]
    Vote(#[from] tcr_voting::VoteError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("ledger error: {0}")]
    Ledger(#[from] tcr_ledger::LedgerError),

    #[error("config error: {0}")]
    Config(String),
}
