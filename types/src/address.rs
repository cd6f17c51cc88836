//! Account address type for applicants and voters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account on the underlying ledger (applicant, challenger, or voter).
///
/// The registry treats addresses as opaque strings: derivation and checksum
/// rules belong to the ledger, which is behind the `Ledger` trait boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Create an account address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
