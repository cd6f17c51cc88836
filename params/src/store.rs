//! The TTL-cached parameter store.

use crate::error::ParamsError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tcr_ledger::Ledger;
use tcr_types::{Timestamp, TokenAmount};

/// Default freshness interval for cached parameters, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

#[derive(Clone, Copy, Debug)]
struct CachedParam {
    value: TokenAmount,
    fetched_at: Timestamp,
}

/// Read-through cache over the ledger's `get_parameter`.
///
/// Single writer per key (the store itself), any number of readers. The
/// lock is never held across an await: the fetch happens lock-free and the
/// cache is written only after the ledger call completes, so an abandoned
/// call leaves the cache untouched.
pub struct ParameterStore {
    ledger: Arc<dyn Ledger>,
    cache: RwLock<HashMap<String, CachedParam>>,
    ttl_secs: u64,
}

impl ParameterStore {
    pub fn new(ledger: Arc<dyn Ledger>, ttl_secs: u64) -> Self {
        Self {
            ledger,
            cache: RwLock::new(HashMap::new()),
            ttl_secs,
        }
    }

    /// Get a parameter value, hitting the ledger only when the cached entry
    /// is missing or stale.
    ///
    /// On fetch failure a stale cached value is still returned; the call
    /// fails only when the cache holds nothing for `name`.
    pub async fn get(&self, name: &str, now: Timestamp) -> Result<TokenAmount, ParamsError> {
        if let Some(value) = self.cached_fresh(name, now) {
            return Ok(value);
        }

        match self.ledger.get_parameter(name).await {
            Ok(value) => {
                let mut cache = self.cache.write().expect("parameter cache poisoned");
                cache.insert(
                    name.to_string(),
                    CachedParam {
                        value,
                        fetched_at: now,
                    },
                );
                Ok(value)
            }
            Err(err) => match self.cached_any(name) {
                Some(stale) => {
                    tracing::warn!(name, error = %err, "parameter fetch failed, serving stale value");
                    Ok(stale)
                }
                None => Err(ParamsError::Unavailable {
                    name: name.to_string(),
                    source: err,
                }),
            },
        }
    }

    /// Convenience accessor for the minimum application deposit.
    pub async fn min_deposit(&self, now: Timestamp) -> Result<TokenAmount, ParamsError> {
        self.get(crate::MIN_DEPOSIT, now).await
    }

    /// Drop the cached entry for `name`, forcing a fetch on next access.
    pub fn invalidate(&self, name: &str) {
        let mut cache = self.cache.write().expect("parameter cache poisoned");
        cache.remove(name);
    }

    fn cached_fresh(&self, name: &str, now: Timestamp) -> Option<TokenAmount> {
        let cache = self.cache.read().expect("parameter cache poisoned");
        cache.get(name).and_then(|entry| {
            if entry.fetched_at.elapsed_since(now) < self.ttl_secs {
                Some(entry.value)
            } else {
                None
            }
        })
    }

    fn cached_any(&self, name: &str) -> Option<TokenAmount> {
        let cache = self.cache.read().expect("parameter cache poisoned");
        cache.get(name).map(|entry| entry.value)
    }
}
