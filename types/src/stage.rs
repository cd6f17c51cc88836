//! Domain lifecycle stages and the stage resolution table.
//!
//! `resolve_stage` is the single place raw ledger state is mapped to a
//! stage. Both the status resolver and the application submitter go through
//! it, so the two can never disagree about where a domain is in its
//! lifecycle.

use crate::state::RawDomainState;
use crate::TokenAmount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle stage of a domain in the registry.
///
/// Exactly one stage per domain at any time. Transitions are one-directional
/// except `Rejected -> Applied` on re-application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainStage {
    /// Not in the registry and no application pending.
    Unlisted,
    /// Application submitted, challenge period running.
    Applied,
    /// Challenged; voters are committing hidden votes.
    InCommitVote,
    /// Commit window closed; voters are revealing.
    InRevealVote,
    /// Listed in the registry.
    Whitelisted,
    /// Application rejected by vote. Re-application is permitted.
    Rejected,
}

impl DomainStage {
    /// Whether a new application may be submitted from this stage.
    ///
    /// Only `Unlisted` and `Rejected` accept applications; a `Whitelisted`
    /// domain must be delisted first, which is outside the core's scope.
    pub fn accepts_application(&self) -> bool {
        matches!(self, DomainStage::Unlisted | DomainStage::Rejected)
    }
}

impl fmt::Display for DomainStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DomainStage::Unlisted => "unlisted",
            DomainStage::Applied => "applied",
            DomainStage::InCommitVote => "in_commit_vote",
            DomainStage::InRevealVote => "in_reveal_vote",
            DomainStage::Whitelisted => "whitelisted",
            DomainStage::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Resolve a poll to its final stage: support must strictly exceed oppose
/// for the listing to survive. Oppose wins ties.
pub fn poll_outcome(support_weight: TokenAmount, oppose_weight: TokenAmount) -> DomainStage {
    if support_weight > oppose_weight {
        DomainStage::Whitelisted
    } else {
        DomainStage::Rejected
    }
}

/// Deterministically map raw ledger state to exactly one stage.
///
/// Transition table:
///
/// ```text
/// Unlisted --apply--> Applied
/// Applied --challenge period expires unchallenged--> Whitelisted
/// Applied --challenged--> InCommitVote
/// InCommitVote --commit deadline passes--> InRevealVote
/// InRevealVote --reveal deadline passes, support > oppose--> Whitelisted
/// InRevealVote --reveal deadline passes, oppose >= support--> Rejected
/// Rejected --apply--> Applied
/// ```
///
/// A deadline has passed once `as_of` reaches it (see
/// [`Timestamp::has_passed`](crate::Timestamp::has_passed)).
pub fn resolve_stage(raw: &RawDomainState) -> DomainStage {
    let listing = match &raw.listing {
        None => return DomainStage::Unlisted,
        Some(listing) => listing,
    };

    match &listing.challenge {
        None => {
            if listing.whitelisted || listing.challenge_deadline.has_passed(raw.as_of) {
                DomainStage::Whitelisted
            } else {
                DomainStage::Applied
            }
        }
        Some(challenge) => {
            if !challenge.commit_deadline.has_passed(raw.as_of) {
                DomainStage::InCommitVote
            } else if !challenge.reveal_deadline.has_passed(raw.as_of) {
                DomainStage::InRevealVote
            } else {
                poll_outcome(challenge.support_weight, challenge.oppose_weight)
            }
        }
    }
}
