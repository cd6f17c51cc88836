//! Pure validation of a candidate application.
//!
//! No I/O and no panics: malformed input is a validation failure, not an
//! exceptional condition. Checks run in a fixed order and short-circuit on
//! the first failure, so the caller always gets the most fundamental
//! problem first.

use serde::{Deserialize, Serialize};
use std::fmt;
use tcr_types::{DomainName, TokenAmount};

/// A candidate application as supplied by the form collaborator.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub domain: DomainName,
    /// Optional contact email; validated only when present.
    pub email: Option<String>,
    /// Tokens the applicant wants to stake.
    pub stake: TokenAmount,
}

/// Why a candidate failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    InvalidDomain,
    InvalidEmail,
    InsufficientStake,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidReason::InvalidDomain => "Invalid domain",
            InvalidReason::InvalidEmail => "Invalid email",
            InvalidReason::InsufficientStake => {
                "Deposit must be equal or greater than the minimum required"
            }
        };
        write!(f, "{msg}")
    }
}

/// The outcome of validating a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Invalid(InvalidReason),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }
}

/// Validate a candidate against the current minimum deposit.
///
/// Checks in order: domain syntax, email syntax (when present), stake
/// amount. `min_deposit` must be a successfully fetched value; the caller
/// fails with an unavailability error rather than defaulting it to zero.
pub fn validate(candidate: &Candidate, min_deposit: TokenAmount) -> ValidationResult {
    if !candidate.domain.is_valid() {
        return ValidationResult::Invalid(InvalidReason::InvalidDomain);
    }

    if let Some(email) = &candidate.email {
        if !is_valid_email(email) {
            return ValidationResult::Invalid(InvalidReason::InvalidEmail);
        }
    }

    if candidate.stake == 0 || candidate.stake < min_deposit {
        return ValidationResult::Invalid(InvalidReason::InsufficientStake);
    }

    ValidationResult::Ok
}

/// Syntactic email check: exactly one `@`, a non-empty local part without
/// whitespace, and a valid domain on the right.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };
    if local.is_empty() || local.chars().any(|c| c.is_whitespace() || c == '@') {
        return false;
    }
    if domain.contains('@') {
        return false;
    }
    DomainName::new(domain).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(domain: &str, email: Option<&str>, stake: TokenAmount) -> Candidate {
        Candidate {
            domain: DomainName::new(domain),
            email: email.map(str::to_string),
            stake,
        }
    }

    #[test]
    fn valid_candidate_passes() {
        let c = candidate("example.com", Some("john@example.com"), 1500);
        assert_eq!(validate(&c, 1000), ValidationResult::Ok);
    }

    #[test]
    fn missing_email_is_fine() {
        let c = candidate("example.com", None, 1500);
        assert_eq!(validate(&c, 1000), ValidationResult::Ok);
    }

    #[test]
    fn invalid_domain_short_circuits() {
        // Both domain and stake are bad; domain is reported first.
        let c = candidate("not a domain", None, 0);
        assert_eq!(
            validate(&c, 1000),
            ValidationResult::Invalid(InvalidReason::InvalidDomain)
        );
    }

    #[test]
    fn domain_without_dot_is_invalid() {
        let c = candidate("nodotcom", None, 1500);
        assert_eq!(
            validate(&c, 1000),
            ValidationResult::Invalid(InvalidReason::InvalidDomain)
        );
    }

    #[test]
    fn bad_email_reported_before_stake() {
        let c = candidate("example.com", Some("not-an-email"), 0);
        assert_eq!(
            validate(&c, 1000),
            ValidationResult::Invalid(InvalidReason::InvalidEmail)
        );
    }

    #[test]
    fn stake_below_minimum_is_insufficient() {
        let c = candidate("example.com", None, 999);
        assert_eq!(
            validate(&c, 1000),
            ValidationResult::Invalid(InvalidReason::InsufficientStake)
        );
    }

    #[test]
    fn stake_equal_to_minimum_passes() {
        let c = candidate("example.com", None, 1000);
        assert_eq!(validate(&c, 1000), ValidationResult::Ok);
    }

    #[test]
    fn zero_stake_fails_even_with_zero_minimum() {
        let c = candidate("example.com", None, 0);
        assert_eq!(
            validate(&c, 0),
            ValidationResult::Invalid(InvalidReason::InsufficientStake)
        );
    }

    #[test]
    fn email_edge_cases() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("john"));
        assert!(!is_valid_email("jo hn@example.com"));
        assert!(!is_valid_email("john@exa mple.com"));
        assert!(!is_valid_email("john@@example.com"));
        assert!(!is_valid_email("john@nodot"));
    }

    #[test]
    fn reasons_render_user_messages() {
        assert_eq!(InvalidReason::InvalidDomain.to_string(), "Invalid domain");
        assert_eq!(InvalidReason::InvalidEmail.to_string(), "Invalid email");
        assert_eq!(
            InvalidReason::InsufficientStake.to_string(),
            "Deposit must be equal or greater than the minimum required"
        );
    }
}
