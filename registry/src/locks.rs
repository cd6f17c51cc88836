//! Per-domain mutual exclusion.
//!
//! Operations on the same domain (a concurrent `apply` and `update_status`,
//! say) must not observe a half-applied transition, while operations on
//! different domains share no state and run freely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tcr_types::DomainName;
use tokio::sync::Mutex as AsyncMutex;

/// A map of per-domain async locks.
///
/// Lock handles are `Arc`ed out so the registry never holds the map lock
/// while a domain operation is in flight. Entries are created on first use
/// and live for the process; the set of domains a client touches is small.
#[derive(Default)]
pub struct DomainLocks {
    locks: Mutex<HashMap<DomainName, Arc<AsyncMutex<()>>>>,
}

impl DomainLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for a domain, creating it on first use.
    pub fn for_domain(&self, domain: &DomainName) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().expect("domain lock map poisoned");
        Arc::clone(locks.entry(domain.clone()).or_default())
    }
}
