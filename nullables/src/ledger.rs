//! Nullable ledger: a complete in-memory `Ledger` implementation.
//!
//! Behaves like a one-node registry chain: applications set the challenge
//! deadline from `applyStageLen`, challenges set commit/reveal deadlines
//! from `commitStageLen`/`revealStageLen`, reveals accumulate tallies.
//! Time comes from a shared [`NullClock`], so tests drive every window
//! explicitly. Test-side controls (`set_parameter`, `set_balance`,
//! `challenge`, `set_offline`) are inherent methods, not part of the trait.

use crate::clock::NullClock;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tcr_ledger::{Ledger, LedgerError, StoredCommit};
use tcr_types::{
    resolve_stage, AccountAddress, ChallengeInfo, CommitmentHash, DomainName, DomainStage,
    ListingInfo, RawDomainState, TokenAmount, TxHash, VoteChoice,
};

/// Fallback stage length (seconds) when a timer parameter is unset.
const DEFAULT_STAGE_LEN_SECS: u64 = 600;

/// The account that stakes application deposits.
const APPLICANT_ACCOUNT: &str = "applicant";

pub struct NullLedger {
    clock: Arc<NullClock>,
    offline: AtomicBool,
    params: Mutex<HashMap<String, TokenAmount>>,
    balances: Mutex<HashMap<String, TokenAmount>>,
    listings: Mutex<HashMap<DomainName, ListingInfo>>,
    commits: Mutex<HashMap<(DomainName, String), StoredCommit>>,
    revealed: Mutex<HashSet<(DomainName, String)>>,
    tx_counter: AtomicU64,
}

impl NullLedger {
    /// A ledger with its own clock starting at time zero.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(NullClock::new(0)))
    }

    /// A ledger driven by a shared clock.
    pub fn with_clock(clock: Arc<NullClock>) -> Self {
        Self {
            clock,
            offline: AtomicBool::new(false),
            params: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            listings: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashMap::new()),
            revealed: Mutex::new(HashSet::new()),
            tx_counter: AtomicU64::new(1),
        }
    }

    // ── Test controls ──────────────────────────────────────────────────

    /// Simulate the ledger being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Set an on-chain configuration parameter.
    pub fn set_parameter(&self, name: &str, value: TokenAmount) {
        self.params
            .lock()
            .unwrap()
            .insert(name.to_string(), value);
    }

    /// Set an account's available balance.
    pub fn set_balance(&self, account: &str, amount: TokenAmount) {
        self.balances
            .lock()
            .unwrap()
            .insert(account.to_string(), amount);
    }

    /// Current available balance of an account.
    pub fn balance_of(&self, account: &str) -> TokenAmount {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Challenge an applied domain, opening its commit window now.
    ///
    /// Stands in for the challenger-side transaction the core never sends.
    pub fn challenge(&self, domain: &DomainName, challenger: &str) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut listings = self.listings.lock().unwrap();
        let listing = listings
            .get_mut(domain)
            .ok_or_else(|| LedgerError::Rejected(format!("domain {domain} is not listed")))?;

        let current = RawDomainState {
            domain: domain.clone(),
            as_of: now,
            listing: Some(listing.clone()),
        };
        if resolve_stage(&current) != DomainStage::Applied {
            return Err(LedgerError::Rejected(format!(
                "domain {domain} is not in its challenge period"
            )));
        }

        let commit_len = self.param_or_default(tcr_params::COMMIT_STAGE_LEN);
        let reveal_len = self.param_or_default(tcr_params::REVEAL_STAGE_LEN);
        let commit_deadline = now.plus_secs(commit_len);
        listing.challenge = Some(ChallengeInfo {
            challenger: AccountAddress::new(challenger),
            commit_deadline,
            reveal_deadline: commit_deadline.plus_secs(reveal_len),
            support_weight: 0,
            oppose_weight: 0,
        });
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(LedgerError::Unavailable("ledger offline".into()))
        } else {
            Ok(())
        }
    }

    fn param_or_default(&self, name: &str) -> u64 {
        self.params
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_STAGE_LEN_SECS)
    }

    fn next_tx_hash(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash::new(bytes)
    }

    fn debit(&self, account: &str, amount: TokenAmount) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(account.to_string()).or_insert(0);
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&self, account: &str, amount: TokenAmount) {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry(account.to_string()).or_insert(0) += amount;
    }

    fn raw_state(&self, domain: &DomainName) -> RawDomainState {
        RawDomainState {
            domain: domain.clone(),
            as_of: self.clock.now(),
            listing: self.listings.lock().unwrap().get(domain).cloned(),
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for NullLedger {
    async fn get_parameter(&self, name: &str) -> Result<TokenAmount, LedgerError> {
        self.check_online()?;
        self.params
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| LedgerError::Rejected(format!("unknown parameter: {name}")))
    }

    async fn apply(&self, domain: &DomainName, stake: TokenAmount) -> Result<TxHash, LedgerError> {
        self.check_online()?;

        let current = self.raw_state(domain);
        if !resolve_stage(&current).accepts_application() {
            return Err(LedgerError::Rejected(format!(
                "domain {domain} is mid-lifecycle"
            )));
        }

        self.debit(APPLICANT_ACCOUNT, stake)?;

        let now = self.clock.now();
        let apply_len = self.param_or_default(tcr_params::APPLY_STAGE_LEN);
        self.listings.lock().unwrap().insert(
            domain.clone(),
            ListingInfo {
                stake,
                applied_at: now,
                challenge_deadline: now.plus_secs(apply_len),
                whitelisted: false,
                challenge: None,
            },
        );
        // A fresh application clears any commits from a previous challenge.
        self.commits
            .lock()
            .unwrap()
            .retain(|(d, _), _| d != domain);
        self.revealed.lock().unwrap().retain(|(d, _)| d != domain);

        Ok(self.next_tx_hash())
    }

    async fn domain_state(&self, domain: &DomainName) -> Result<RawDomainState, LedgerError> {
        self.check_online()?;
        Ok(self.raw_state(domain))
    }

    async fn account_balance(&self, account: &AccountAddress) -> Result<TokenAmount, LedgerError> {
        self.check_online()?;
        Ok(self.balance_of(account.as_str()))
    }

    async fn commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        commitment: CommitmentHash,
        weight: TokenAmount,
    ) -> Result<TxHash, LedgerError> {
        self.check_online()?;

        let current = self.raw_state(domain);
        if resolve_stage(&current) != DomainStage::InCommitVote {
            return Err(LedgerError::Rejected(format!(
                "commit window closed for {domain}"
            )));
        }

        let key = (domain.clone(), voter.as_str().to_string());
        // Re-commit during the window replaces the old commitment and stake.
        if let Some(old) = self.commits.lock().unwrap().remove(&key) {
            self.credit(voter.as_str(), old.weight);
        }
        self.debit(voter.as_str(), weight)?;
        self.commits.lock().unwrap().insert(
            key,
            StoredCommit {
                commitment,
                weight,
                committed_at: self.clock.now(),
            },
        );
        Ok(self.next_tx_hash())
    }

    async fn reveal(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        _secret: &[u8],
    ) -> Result<TxHash, LedgerError> {
        self.check_online()?;

        let current = self.raw_state(domain);
        if resolve_stage(&current) != DomainStage::InRevealVote {
            return Err(LedgerError::Rejected(format!(
                "reveal window closed for {domain}"
            )));
        }

        let key = (domain.clone(), voter.as_str().to_string());
        if !self.commits.lock().unwrap().contains_key(&key) {
            return Err(LedgerError::Rejected(format!(
                "no commit by {voter} on {domain}"
            )));
        }
        if !self.revealed.lock().unwrap().insert(key) {
            return Err(LedgerError::Rejected(format!(
                "{voter} already revealed on {domain}"
            )));
        }

        let mut listings = self.listings.lock().unwrap();
        let challenge = listings
            .get_mut(domain)
            .and_then(|l| l.challenge.as_mut())
            .ok_or_else(|| LedgerError::Rejected(format!("no challenge on {domain}")))?;
        match choice {
            VoteChoice::Support => challenge.support_weight += weight,
            VoteChoice::Oppose => challenge.oppose_weight += weight,
        }
        Ok(self.next_tx_hash())
    }

    async fn stored_commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
    ) -> Result<Option<StoredCommit>, LedgerError> {
        self.check_online()?;
        let key = (domain.clone(), voter.as_str().to_string());
        Ok(self.commits.lock().unwrap().get(&key).cloned())
    }
}
