//! The registry facade: the service object the UI collaborator calls.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::locks::DomainLocks;
use crate::resolver::StatusResolver;
use std::sync::Arc;
use tcr_application::{
    validate, ApplicationMetadata, ApplicationReceipt, ApplicationSubmitter, ApplyError, Candidate,
    ValidationResult,
};
use tcr_events::EventBus;
use tcr_ledger::{HttpLedger, Ledger};
use tcr_params::ParameterStore;
use tcr_types::{AccountAddress, DomainName, DomainStage, Timestamp, TokenAmount, VoteChoice};
use tcr_voting::{CommitReceipt, RevealReceipt, Tally, VotingManager};

/// The TCR registry core.
///
/// One instance per process, created at startup with an explicit event bus
/// (subscribed to by UI components) and a ledger backend. All domain-scoped
/// operations serialize per domain; operations on different domains run
/// concurrently.
pub struct Registry {
    params: ParameterStore,
    submitter: ApplicationSubmitter,
    voting: VotingManager,
    resolver: StatusResolver,
    locks: DomainLocks,
}

impl Registry {
    /// Build a registry over an existing ledger backend.
    pub fn new(ledger: Arc<dyn Ledger>, bus: Arc<EventBus>, config: &RegistryConfig) -> Self {
        Self {
            params: ParameterStore::new(Arc::clone(&ledger), config.param_ttl_secs),
            submitter: ApplicationSubmitter::new(Arc::clone(&ledger)),
            voting: VotingManager::new(Arc::clone(&ledger)),
            resolver: StatusResolver::new(ledger, bus),
            locks: DomainLocks::new(),
        }
    }

    /// Build a registry talking JSON-RPC to the node named in the config.
    pub fn connect(config: &RegistryConfig, bus: Arc<EventBus>) -> Result<Self, RegistryError> {
        let ledger = HttpLedger::new(&config.node_url)?;
        Ok(Self::new(Arc::new(ledger), bus, config))
    }

    /// Read a registry-wide configuration parameter (cached).
    pub async fn get_parameter(&self, name: &str) -> Result<TokenAmount, RegistryError> {
        Ok(self.params.get(name, Timestamp::now()).await?)
    }

    /// Validate and submit a staked application for `domain`.
    ///
    /// The minimum deposit must be fetchable (or cached); an unavailable
    /// `minDeposit` fails the call rather than being defaulted to zero and
    /// letting an under-staked application through.
    pub async fn apply(
        &self,
        domain: &DomainName,
        stake: TokenAmount,
        metadata: &ApplicationMetadata,
    ) -> Result<ApplicationReceipt, RegistryError> {
        let min_deposit = self.params.min_deposit(Timestamp::now()).await?;

        let candidate = Candidate {
            domain: domain.clone(),
            email: metadata.email.clone(),
            stake,
        };
        if let ValidationResult::Invalid(reason) = validate(&candidate, min_deposit) {
            return Err(ApplyError::Validation(reason).into());
        }

        let lock = self.locks.for_domain(domain);
        let _guard = lock.lock().await;

        let receipt = self.submitter.submit(domain, stake, metadata).await?;

        // Refresh the cached stage so subscribers hear about Applied without
        // an extra UI round-trip. The submission already succeeded; a refresh
        // failure downgrades to stale-but-available.
        if let Err(err) = self.resolver.update_status(domain).await {
            tracing::warn!(domain = %domain, error = %err, "post-apply status refresh failed");
        }

        Ok(receipt)
    }

    /// Recompute and cache the stage for `domain`, publishing a
    /// `stageChanged` event when it moved.
    pub async fn update_status(&self, domain: &DomainName) -> Result<DomainStage, RegistryError> {
        let lock = self.locks.for_domain(domain);
        let _guard = lock.lock().await;
        Ok(self.resolver.update_status(domain).await?)
    }

    /// The last successfully resolved stage, if any.
    pub fn cached_stage(&self, domain: &DomainName) -> Option<DomainStage> {
        self.resolver.cached_stage(domain)
    }

    /// Stake a hidden vote during a challenge's commit window.
    pub async fn commit_vote(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<CommitReceipt, RegistryError> {
        let lock = self.locks.for_domain(domain);
        let _guard = lock.lock().await;
        Ok(self
            .voting
            .commit_vote(domain, voter, choice, weight, secret)
            .await?)
    }

    /// Disclose a committed vote during the reveal window.
    pub async fn reveal_vote(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<RevealReceipt, RegistryError> {
        let lock = self.locks.for_domain(domain);
        let _guard = lock.lock().await;
        Ok(self
            .voting
            .reveal_vote(domain, voter, choice, weight, secret)
            .await?)
    }

    /// The revealed-weight tally for a domain's challenge.
    pub async fn tally(&self, domain: &DomainName) -> Result<Tally, RegistryError> {
        Ok(self.voting.tally(domain).await?)
    }
}
