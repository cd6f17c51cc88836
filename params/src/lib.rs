//! Parameter store: read-through cache over the registry's on-chain
//! configuration.
//!
//! Values are cached process-wide per parameter name. A cache entry carries
//! its fetch timestamp and goes stale after the configured interval or on
//! explicit invalidation. When the ledger cannot be reached, a stale value
//! is still served; the store only fails when it has nothing at all.

pub mod error;
pub mod store;

pub use error::ParamsError;
pub use store::ParameterStore;

/// Minimum token deposit required to apply.
pub const MIN_DEPOSIT: &str = "minDeposit";

/// Length of the application/challenge period in seconds.
pub const APPLY_STAGE_LEN: &str = "applyStageLen";

/// Length of the commit window in seconds.
pub const COMMIT_STAGE_LEN: &str = "commitStageLen";

/// Length of the reveal window in seconds.
pub const REVEAL_STAGE_LEN: &str = "revealStageLen";
