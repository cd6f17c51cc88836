//! Abstract ledger access for the TCR registry core.
//!
//! The registry is a logical client above an external ledger RPC boundary.
//! Every backend (the JSON-RPC client in [`http`], the in-memory ledger in
//! `tcr-nullables`) implements the [`Ledger`] trait; the rest of the
//! workspace depends only on the trait.

pub mod error;
pub mod http;

pub use error::LedgerError;
pub use http::HttpLedger;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tcr_types::{
    AccountAddress, CommitmentHash, DomainName, RawDomainState, Timestamp, TokenAmount, TxHash,
    VoteChoice,
};

/// A vote commitment as stored on the ledger during the commit phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredCommit {
    pub commitment: CommitmentHash,
    pub weight: TokenAmount,
    pub committed_at: Timestamp,
}

/// The external ledger/registry collaborator.
///
/// All operations suspend for network/consensus latency and surface errors
/// without retrying; retry policy belongs to the caller, since blind retry
/// of a staking transaction risks double-stake.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Read a registry-wide configuration parameter.
    async fn get_parameter(&self, name: &str) -> Result<TokenAmount, LedgerError>;

    /// Stake `stake` tokens against `domain` as a new application.
    ///
    /// Resolves once the transaction has at least one confirmation, so a
    /// returned hash is a deterministic success signal.
    async fn apply(&self, domain: &DomainName, stake: TokenAmount) -> Result<TxHash, LedgerError>;

    /// Read the raw on-chain state and timers for a domain.
    async fn domain_state(&self, domain: &DomainName) -> Result<RawDomainState, LedgerError>;

    /// Available (unstaked) token balance of an account.
    async fn account_balance(&self, account: &AccountAddress) -> Result<TokenAmount, LedgerError>;

    /// Record a hidden vote commitment, staking `weight` tokens.
    async fn commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        commitment: CommitmentHash,
        weight: TokenAmount,
    ) -> Result<TxHash, LedgerError>;

    /// Disclose a previously committed vote, adding `weight` to the tally
    /// for `choice`.
    async fn reveal(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<TxHash, LedgerError>;

    /// The commitment a voter has stored for the active challenge on
    /// `domain`, if any.
    async fn stored_commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
    ) -> Result<Option<StoredCommit>, LedgerError>;
}
