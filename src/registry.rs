//! Read-through cache of the server's variant list.
//!
//! The cache is only ever replaced wholesale by a full re-fetch. Nothing in
//! this crate derives membership from a local mutation; after classifying,
//! callers refresh and take whatever the server now reports.

use crate::client::ApiClient;
use crate::error::ErrorKind;
use crate::types::{StoredVariant, VariantId};
use crate::Result;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Freshness of the cached list. Keeps "the server has no variants" apart
/// from "we could not ask".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStatus {
    NotLoaded,
    Fresh { count: usize },
    /// The last refresh failed; the cache holds whatever was loaded before it.
    Stale { kind: ErrorKind },
}

pub struct VariantRegistry {
    api: ApiClient,
    cache: ArcSwap<Vec<StoredVariant>>,
    status: Mutex<RegistryStatus>,
    generation: AtomicU64,
}

impl VariantRegistry {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: ArcSwap::from_pointee(Vec::new()),
            status: Mutex::new(RegistryStatus::NotLoaded),
            generation: AtomicU64::new(0),
        }
    }

    fn status_lock(&self) -> MutexGuard<'_, RegistryStatus> {
        self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Re-fetch the full list and replace the cache.
    ///
    /// Best effort: on failure the previous cache stays in place and the
    /// error is logged, never returned. Without a session this is a no-op.
    /// A refresh that finishes after a newer one was issued is discarded.
    pub async fn refresh(&self) -> Arc<Vec<StoredVariant>> {
        if !self.api.transport().has_credential() {
            debug!("registry refresh skipped: no active session");
            return self.variants();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.api.list_variants().await;

        let mut status = self.status_lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded registry refresh");
            drop(status);
            return self.variants();
        }
        match fetched {
            Ok(variants) => {
                info!(count = variants.len(), "variant registry refreshed");
                *status = RegistryStatus::Fresh {
                    count: variants.len(),
                };
                self.cache.store(Arc::new(variants));
            }
            Err(e) => {
                warn!(error = %e, "variant registry refresh failed; keeping cached list");
                *status = RegistryStatus::Stale { kind: e.kind() };
            }
        }
        drop(status);
        self.variants()
    }

    pub fn variants(&self) -> Arc<Vec<StoredVariant>> {
        self.cache.load_full()
    }

    pub fn status(&self) -> RegistryStatus {
        *self.status_lock()
    }

    pub fn find_by_hgvs(&self, hgvs: &str) -> Option<StoredVariant> {
        self.cache.load().iter().find(|v| v.hgvs == hgvs).cloned()
    }

    /// Fetch a single record from the server. Does not touch the cache.
    pub async fn lookup(&self, id: VariantId) -> Result<StoredVariant> {
        self.api.get_variant(id).await
    }

    /// Forget everything, fencing out in-flight refreshes. Used on logout.
    pub fn clear(&self) {
        let mut status = self.status_lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.store(Arc::new(Vec::new()));
        *status = RegistryStatus::NotLoaded;
    }
}
