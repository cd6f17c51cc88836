use tcr_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    /// The ledger could not be queried and no cached value exists.
    #[error("parameter {name} unavailable: {source}")]
    Unavailable {
        name: String,
        #[source]
        source: LedgerError,
    },
}
