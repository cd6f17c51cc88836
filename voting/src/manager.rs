//! Commit and reveal orchestration over the ledger.

use crate::commitment::commitment_hash;
use crate::error::VoteError;
use crate::tally::Tally;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tcr_ledger::Ledger;
use tcr_types::{
    resolve_stage, AccountAddress, CommitmentHash, DomainName, DomainStage, TokenAmount, TxHash,
    VoteChoice,
};

/// Proof that a hidden vote was recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub domain: DomainName,
    pub voter: AccountAddress,
    pub commitment: CommitmentHash,
    pub weight: TokenAmount,
    pub tx_hash: TxHash,
}

/// Proof that a vote was revealed and tallied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReceipt {
    pub domain: DomainName,
    pub voter: AccountAddress,
    pub choice: VoteChoice,
    pub weight: TokenAmount,
    pub tx_hash: TxHash,
}

/// Drives the commit/reveal protocol for challenged domains.
///
/// Strictly sequential per domain-challenge: a reveal requires that voter's
/// prior commit, and a commit may be revealed at most once. The second
/// identical reveal returns the original receipt instead of re-tallying.
pub struct VotingManager {
    ledger: Arc<dyn Ledger>,
    revealed: Mutex<HashMap<(DomainName, AccountAddress), RevealReceipt>>,
}

impl VotingManager {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            revealed: Mutex::new(HashMap::new()),
        }
    }

    /// Stake a hidden vote during the commit window.
    ///
    /// The plaintext choice never leaves the process; only its commitment is
    /// sent to the ledger.
    pub async fn commit_vote(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<CommitReceipt, VoteError> {
        let raw = self.ledger.domain_state(domain).await?;
        let stage = resolve_stage(&raw);
        if stage != DomainStage::InCommitVote {
            return Err(VoteError::Phase {
                domain: domain.clone(),
                stage,
                expected: DomainStage::InCommitVote,
            });
        }

        let available = self.ledger.account_balance(voter).await?;
        if weight > available {
            return Err(VoteError::InsufficientFunds {
                needed: weight,
                available,
            });
        }

        let commitment = commitment_hash(domain, voter, choice, weight, secret);
        let tx_hash = self.ledger.commit(domain, voter, commitment, weight).await?;

        tracing::debug!(domain = %domain, voter = %voter, weight, "vote committed");

        Ok(CommitReceipt {
            domain: domain.clone(),
            voter: voter.clone(),
            commitment,
            weight,
            tx_hash,
        })
    }

    /// Disclose a committed vote during the reveal window.
    ///
    /// The commitment is recomputed from the supplied values and compared
    /// against the one stored on the ledger; a mismatch fails without
    /// touching the tally.
    pub async fn reveal_vote(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<RevealReceipt, VoteError> {
        let key = (domain.clone(), voter.clone());
        if let Some(existing) = self.revealed.lock().expect("reveal map poisoned").get(&key) {
            if existing.choice == choice && existing.weight == weight {
                tracing::debug!(domain = %domain, voter = %voter, "duplicate reveal, returning original receipt");
                return Ok(existing.clone());
            }
        }

        let raw = self.ledger.domain_state(domain).await?;
        let stage = resolve_stage(&raw);
        if stage != DomainStage::InRevealVote {
            return Err(VoteError::Phase {
                domain: domain.clone(),
                stage,
                expected: DomainStage::InRevealVote,
            });
        }

        let stored = self
            .ledger
            .stored_commit(domain, voter)
            .await?
            .ok_or_else(|| VoteError::MissingCommit {
                domain: domain.clone(),
                voter: voter.clone(),
            })?;

        let recomputed = commitment_hash(domain, voter, choice, weight, secret);
        if recomputed != stored.commitment {
            return Err(VoteError::CommitMismatch {
                domain: domain.clone(),
                voter: voter.clone(),
            });
        }

        let tx_hash = self
            .ledger
            .reveal(domain, voter, choice, weight, secret)
            .await?;

        tracing::debug!(domain = %domain, voter = %voter, weight, "vote revealed");

        let receipt = RevealReceipt {
            domain: domain.clone(),
            voter: voter.clone(),
            choice,
            weight,
            tx_hash,
        };
        self.revealed
            .lock()
            .expect("reveal map poisoned")
            .insert(key, receipt.clone());
        Ok(receipt)
    }

    /// The current revealed-weight tally for a domain's challenge.
    ///
    /// Zero on both sides when the domain has no challenge.
    pub async fn tally(&self, domain: &DomainName) -> Result<Tally, VoteError> {
        let raw = self.ledger.domain_state(domain).await?;
        let tally = raw
            .listing
            .as_ref()
            .and_then(|l| l.challenge.as_ref())
            .map(|c| Tally::new(c.support_weight, c.oppose_weight))
            .unwrap_or_default();
        Ok(tally)
    }
}
