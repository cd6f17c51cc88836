//! Application pipeline: validating a candidate application and submitting
//! the staked transaction to the ledger.

pub mod error;
pub mod submit;
pub mod validate;

pub use error::ApplyError;
pub use submit::{ApplicationMetadata, ApplicationReceipt, ApplicationSubmitter};
pub use validate::{validate, Candidate, InvalidReason, ValidationResult};
