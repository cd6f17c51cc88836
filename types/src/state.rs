//! Raw on-chain domain state as reported by the ledger.
//!
//! The ledger owns the source of truth; these structs are the read-only view
//! the core resolves stages from. `as_of` carries the ledger's own view time
//! so that resolution is a pure function of this struct alone.

use crate::address::AccountAddress;
use crate::domain::DomainName;
use crate::time::Timestamp;
use crate::TokenAmount;
use serde::{Deserialize, Serialize};

/// A voter's position on a challenged application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    /// Keep the domain: the application should be whitelisted.
    Support,
    /// Remove the domain: the application should be rejected.
    Oppose,
}

/// Everything the ledger knows about one domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDomainState {
    pub domain: DomainName,
    /// The ledger's view time when this state was read.
    pub as_of: Timestamp,
    /// The current listing, if the domain has ever applied and not been
    /// delisted. `None` means the domain is unlisted.
    pub listing: Option<ListingInfo>,
}

/// An application/listing record on the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingInfo {
    /// Tokens staked by the applicant.
    pub stake: TokenAmount,
    /// When the application transaction was accepted.
    pub applied_at: Timestamp,
    /// End of the challenge period. Unchallenged applications whitelist once
    /// this passes.
    pub challenge_deadline: Timestamp,
    /// Set by the ledger once the listing has been finalized onto the
    /// whitelist.
    pub whitelisted: bool,
    /// The active or resolved challenge, if any.
    pub challenge: Option<ChallengeInfo>,
}

/// A challenge against a listing, with its commit/reveal timers and tallies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub challenger: AccountAddress,
    /// End of the commit window.
    pub commit_deadline: Timestamp,
    /// End of the reveal window.
    pub reveal_deadline: Timestamp,
    /// Revealed weight in favor of the listing.
    pub support_weight: TokenAmount,
    /// Revealed weight against the listing.
    pub oppose_weight: TokenAmount,
}
