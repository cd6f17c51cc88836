//! Domain name type, the registry's global key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully-qualified domain name listed (or applying to be listed) in the
/// registry.
///
/// Construction does not validate: user input flows through the stake
/// validator, which reports bad syntax as a validation result instead of
/// panicking. [`DomainName::is_valid`] holds the actual syntax rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainName(String);

/// Maximum total length of a domain name in bytes.
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label between dots.
const MAX_LABEL_LEN: usize = 63;

impl DomainName {
    /// Wrap a raw string as a domain name.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw domain string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a syntactically valid DNS domain.
    ///
    /// Rules:
    /// - at least one dot (a bare hostname is not a registrable domain)
    /// - no scheme prefix, path separators, ports, or whitespace
    /// - each label is 1..=63 characters of `[A-Za-z0-9-]`, not starting or
    ///   ending with a hyphen
    /// - the final label (TLD) is alphabetic and at least 2 characters
    /// - total length at most 253 bytes
    pub fn is_valid(&self) -> bool {
        let s = self.0.as_str();
        if s.is_empty() || s.len() > MAX_DOMAIN_LEN {
            return false;
        }
        if s.chars().any(|c| c == '/' || c == ':' || c.is_whitespace()) {
            return false;
        }
        if !s.contains('.') {
            return false;
        }

        let labels: Vec<&str> = s.split('.').collect();
        for label in &labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return false;
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return false;
            }
            if label.starts_with('-') || label.ends_with('-') {
                return false;
            }
        }

        let tld = labels[labels.len() - 1];
        tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DomainName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DomainName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
