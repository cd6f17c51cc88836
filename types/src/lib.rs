//! Fundamental types for the TCR domain registry.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: domain names, account addresses, hashes, timestamps, lifecycle
//! stages, and the raw on-chain state returned by the ledger.

pub mod address;
pub mod domain;
pub mod hash;
pub mod stage;
pub mod state;
pub mod time;

pub use address::AccountAddress;
pub use domain::DomainName;
pub use hash::{CommitmentHash, TxHash};
pub use stage::{poll_outcome, resolve_stage, DomainStage};
pub use state::{ChallengeInfo, ListingInfo, RawDomainState, VoteChoice};
pub use time::Timestamp;

/// Token amounts in raw units.
pub type TokenAmount = u128;
