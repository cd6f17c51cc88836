//! Revealed-vote tallies.

use serde::{Deserialize, Serialize};
use tcr_types::{poll_outcome, DomainStage, TokenAmount, VoteChoice};

/// Running weight totals for a challenge poll.
///
/// Only successfully revealed votes are counted; an unrevealed commit
/// contributes nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub support: TokenAmount,
    pub oppose: TokenAmount,
}

impl Tally {
    pub fn new(support: TokenAmount, oppose: TokenAmount) -> Self {
        Self { support, oppose }
    }

    /// Add revealed weight to one side.
    pub fn add(&mut self, choice: VoteChoice, weight: TokenAmount) {
        match choice {
            VoteChoice::Support => self.support = self.support.saturating_add(weight),
            VoteChoice::Oppose => self.oppose = self.oppose.saturating_add(weight),
        }
    }

    /// The stage this poll resolves to. Oppose wins ties.
    pub fn outcome(&self) -> DomainStage {
        poll_outcome(self.support, self.oppose)
    }
}
