//! Status resolution: mapping ledger state to cached, observable stages.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tcr_events::{EventBus, RegistryEvent};
use tcr_ledger::{Ledger, LedgerError};
use tcr_types::{resolve_stage, DomainName, DomainStage};
use thiserror::Error;

/// Failure to refresh a domain's stage.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The ledger could not be queried. The previously cached stage (if
    /// any) is retained and still readable via `cached_stage`; it is never
    /// silently substituted for a fresh result.
    #[error("status for {domain} unavailable: {source}")]
    Unavailable {
        domain: DomainName,
        #[source]
        source: LedgerError,
    },
}

/// Resolves domain stages from the ledger and publishes changes.
///
/// `update_status` is idempotent: with no intervening ledger change it
/// returns the same stage and publishes nothing. The stage cache is written
/// only after the ledger call completes, so an abandoned call leaves it
/// consistent.
pub struct StatusResolver {
    ledger: Arc<dyn Ledger>,
    bus: Arc<EventBus>,
    stages: RwLock<HashMap<DomainName, DomainStage>>,
}

impl StatusResolver {
    pub fn new(ledger: Arc<dyn Ledger>, bus: Arc<EventBus>) -> Self {
        Self {
            ledger,
            bus,
            stages: RwLock::new(HashMap::new()),
        }
    }

    /// Recompute the stage for `domain` from raw ledger state.
    ///
    /// Publishes `stageChanged` when the freshly resolved stage differs
    /// from the cached one. A domain never seen before counts as
    /// `Unlisted`, the natural zero state.
    pub async fn update_status(&self, domain: &DomainName) -> Result<DomainStage, StatusError> {
        let raw = self
            .ledger
            .domain_state(domain)
            .await
            .map_err(|source| StatusError::Unavailable {
                domain: domain.clone(),
                source,
            })?;

        let new_stage = resolve_stage(&raw);

        let old_stage = {
            let mut stages = self.stages.write().expect("stage cache poisoned");
            stages
                .insert(domain.clone(), new_stage)
                .unwrap_or(DomainStage::Unlisted)
        };

        if old_stage != new_stage {
            tracing::info!(domain = %domain, old = %old_stage, new = %new_stage, "stage changed");
            self.bus.publish(&RegistryEvent::StageChanged {
                domain: domain.clone(),
                old_stage,
                new_stage,
            });
        }

        Ok(new_stage)
    }

    /// The last successfully resolved stage, if any.
    pub fn cached_stage(&self, domain: &DomainName) -> Option<DomainStage> {
        let stages = self.stages.read().expect("stage cache poisoned");
        stages.get(domain).copied()
    }
}
