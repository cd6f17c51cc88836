//! Staked application submission.

use crate::error::ApplyError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tcr_ledger::{Ledger, LedgerError};
use tcr_types::{resolve_stage, DomainName, Timestamp, TokenAmount, TxHash};

/// Off-chain descriptive fields supplied with an application.
///
/// Carried but not validated by the core (the email is checked earlier, as
/// part of candidate validation). Persistence of these fields is out of
/// scope; the receipt only acknowledges they were seen.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApplicationMetadata {
    pub site_name: Option<String>,
    pub country: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Proof of an accepted application.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub domain: DomainName,
    pub stake: TokenAmount,
    pub tx_hash: TxHash,
    /// Ledger view time at submission.
    pub submitted_at: Timestamp,
    /// Acknowledgement that the off-chain metadata was received.
    pub metadata_saved: bool,
}

/// Turns a validated candidate into a ledger transaction.
pub struct ApplicationSubmitter {
    ledger: Arc<dyn Ledger>,
}

impl ApplicationSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Submit a staked application for `domain`.
    ///
    /// The caller must have validated the candidate already. The domain must
    /// currently be `Unlisted` or `Rejected`; anything mid-lifecycle is a
    /// `StageConflict`. Blocks until the ledger confirms the transaction, so
    /// a returned receipt means the stake is locked and the stage is
    /// `Applied`.
    pub async fn submit(
        &self,
        domain: &DomainName,
        stake: TokenAmount,
        metadata: &ApplicationMetadata,
    ) -> Result<ApplicationReceipt, ApplyError> {
        let raw = self.ledger.domain_state(domain).await?;
        let stage = resolve_stage(&raw);
        if !stage.accepts_application() {
            return Err(ApplyError::StageConflict {
                domain: domain.clone(),
                stage,
            });
        }

        let tx_hash = self.ledger.apply(domain, stake).await.map_err(|e| match e {
            LedgerError::InsufficientFunds { needed, available } => {
                ApplyError::InsufficientFunds { needed, available }
            }
            other => ApplyError::Ledger(other),
        })?;

        tracing::info!(domain = %domain, stake, tx = %tx_hash, "application submitted");

        Ok(ApplicationReceipt {
            domain: domain.clone(),
            stake,
            tx_hash,
            submitted_at: raw.as_of,
            metadata_saved: true,
        })
    }
}
