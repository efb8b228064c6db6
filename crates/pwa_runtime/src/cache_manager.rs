//! Offline resource cache manager.
//!
//! Fetches the fixed resource list into a named cache region, strictly
//! sequentially, accumulating per-resource failures without aborting the
//! batch, and persists the latest run status through the key-value store.

use std::{cell::Cell, rc::Rc};

use serde::{Deserialize, Serialize};

use platform_host::{unix_time_ms_now, CacheHost, KeyValueStore};

use crate::resources::{resource_urls, RESOURCE_CACHE_NAME};

/// Storage key holding the latest persisted [`CacheRunResult`].
pub const CACHE_STATUS_KEY: &str = "offline_cache_status";
/// Storage key holding the epoch-millisecond timestamp of the latest run.
pub const CACHE_TIMESTAMP_KEY: &str = "offline_cache_timestamp";

/// Whole-run failure message when the platform has no cache capability.
pub const CACHE_UNAVAILABLE_ERROR: &str = "Cache API not available";
/// Whole-run failure message when a run is already in flight.
pub const CACHE_RUN_IN_FLIGHT_ERROR: &str = "cache run already in progress";

/// Persisted snapshot of the most recent caching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRunResult {
    /// Resources stored successfully.
    pub cached: usize,
    /// Resources that failed to fetch or store.
    pub failed: usize,
    /// Total resources attempted.
    pub total: usize,
    /// Whether every resource was stored (`failed == 0`).
    pub complete: bool,
}

/// Persisted run snapshot plus its timestamp and read-time age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    /// The persisted run snapshot.
    pub result: CacheRunResult,
    /// Epoch milliseconds of the run that produced `result`, when recorded.
    pub timestamp: Option<u64>,
    /// Elapsed milliseconds since `timestamp`, computed at read time.
    pub age_ms: Option<u64>,
}

/// One recorded failure from a caching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFailure {
    /// Failing resource URL; absent for whole-run failures.
    pub url: Option<String>,
    /// Human-readable failure description.
    pub error: String,
}

impl CacheFailure {
    fn whole_run(error: impl Into<String>) -> Self {
        Self {
            url: None,
            error: error.into(),
        }
    }
}

/// Outcome of one [`OfflineCacheManager::cache_resources`] invocation.
///
/// `success` means "the run executed", not "the run was error-free";
/// callers must check `failed` (or the persisted `complete` flag) for
/// partial-failure semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRunReport {
    /// Whether the batch ran to completion.
    pub success: bool,
    /// Resources stored successfully.
    pub cached: usize,
    /// Resources that failed.
    pub failed: usize,
    /// Per-resource and whole-run failures, in occurrence order.
    pub errors: Vec<CacheFailure>,
}

/// Progress callback receiving `(attempted, total)` after each resource.
pub type ProgressFn<'p> = &'p mut dyn FnMut(usize, usize);

/// Manager for the named offline resource cache region.
pub struct OfflineCacheManager {
    host: Rc<dyn CacheHost>,
    store: KeyValueStore,
    in_flight: Cell<bool>,
}

struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl OfflineCacheManager {
    /// Builds a manager over the given cache host and persisted store.
    pub fn new(host: Rc<dyn CacheHost>, store: KeyValueStore) -> Self {
        Self {
            host,
            store,
            in_flight: Cell::new(false),
        }
    }

    /// Fetches and stores every resource in the fixed list, sequentially.
    ///
    /// A single resource failure never aborts the run; failures are
    /// accumulated and reported. Capability absence or a region-open failure
    /// aborts the whole run with `success: false`. Overlapping invocations
    /// are rejected the same way. On completion the run snapshot and a
    /// timestamp are persisted.
    pub async fn cache_resources(&self, mut on_progress: Option<ProgressFn<'_>>) -> CacheRunReport {
        if self.in_flight.get() {
            return CacheRunReport {
                success: false,
                cached: 0,
                failed: 0,
                errors: vec![CacheFailure::whole_run(CACHE_RUN_IN_FLIGHT_ERROR)],
            };
        }
        self.in_flight.set(true);
        let _guard = InFlightGuard(&self.in_flight);

        let urls = resource_urls();
        let total = urls.len();

        if !self.host.is_supported() {
            return CacheRunReport {
                success: false,
                cached: 0,
                failed: total,
                errors: vec![CacheFailure::whole_run(CACHE_UNAVAILABLE_ERROR)],
            };
        }

        let region = match self.host.open_region(RESOURCE_CACHE_NAME).await {
            Ok(region) => region,
            Err(error) => {
                log::warn!("cache region open failed: {error}");
                return CacheRunReport {
                    success: false,
                    cached: 0,
                    failed: total,
                    errors: vec![CacheFailure::whole_run(error)],
                };
            }
        };

        let mut cached = 0;
        let mut failed = 0;
        let mut errors = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            match region.store_url(url).await {
                Ok(()) => cached += 1,
                Err(error) => {
                    failed += 1;
                    log::warn!("failed to cache {url}: {error}");
                    errors.push(CacheFailure {
                        url: Some(url.clone()),
                        error: error.to_string(),
                    });
                }
            }
            if let Some(progress) = on_progress.as_mut() {
                progress(index + 1, total);
            }
        }

        let result = CacheRunResult {
            cached,
            failed,
            total,
            complete: failed == 0,
        };
        self.store.set_json(CACHE_STATUS_KEY, &result);
        self.store.set_json(CACHE_TIMESTAMP_KEY, &unix_time_ms_now());

        CacheRunReport {
            success: true,
            cached,
            failed,
            errors,
        }
    }

    /// Reads the persisted status of the latest run, with its read-time age.
    /// Returns `None` when no run has ever persisted a status.
    pub fn cache_status(&self) -> Option<CacheStatus> {
        let result: CacheRunResult = self.store.get_typed(CACHE_STATUS_KEY)?;
        let timestamp: Option<u64> = self.store.get_typed(CACHE_TIMESTAMP_KEY);
        let age_ms = timestamp.map(|t| unix_time_ms_now().saturating_sub(t));
        Some(CacheStatus {
            result,
            timestamp,
            age_ms,
        })
    }

    /// Whether the resource set is fully cached according to the persisted
    /// status.
    pub fn is_cached(&self) -> bool {
        self.cache_status()
            .map_or(false, |status| status.result.complete)
    }

    /// Deletes the resource cache region (tolerating its absence) and
    /// removes the persisted status keys. Returns `false` only when the
    /// region delete step fails.
    pub async fn clear_cache(&self) -> bool {
        let mut ok = true;
        if self.host.is_supported() {
            if let Err(error) = self.host.delete_region(RESOURCE_CACHE_NAME).await {
                log::warn!("failed to clear resource cache: {error}");
                ok = false;
            }
        }
        self.store.remove(CACHE_STATUS_KEY);
        self.store.remove(CACHE_TIMESTAMP_KEY);
        ok
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryCacheHost, MemoryStorageBackend, StorageBackend, StoreError};
    use pretty_assertions::assert_eq;

    use super::*;

    fn manager() -> (OfflineCacheManager, MemoryCacheHost, MemoryStorageBackend) {
        let host = MemoryCacheHost::default();
        let backend = MemoryStorageBackend::default();
        let store = KeyValueStore::new(Rc::new(backend.clone()));
        (
            OfflineCacheManager::new(Rc::new(host.clone()), store),
            host,
            backend,
        )
    }

    #[test]
    fn full_run_caches_everything_and_persists_complete_status() {
        let (manager, host, backend) = manager();
        let report = block_on(manager.cache_resources(None));
        let total = resource_urls().len();

        assert_eq!(
            report,
            CacheRunReport {
                success: true,
                cached: total,
                failed: 0,
                errors: Vec::new(),
            }
        );
        assert_eq!(host.stored_urls(RESOURCE_CACHE_NAME).len(), total);
        assert!(manager.is_cached());

        let status = manager.cache_status().expect("status");
        assert_eq!(
            status.result,
            CacheRunResult {
                cached: total,
                failed: 0,
                total,
                complete: true,
            }
        );
        assert!(status.timestamp.is_some());
        assert!(status.age_ms.expect("age") < 10_000);

        // Persisted under the application prefix.
        assert!(backend
            .get_raw("redcards_offline_cache_status")
            .expect("raw read")
            .is_some());
        assert!(backend
            .get_raw("redcards_offline_cache_timestamp")
            .expect("raw read")
            .is_some());
    }

    #[test]
    fn k_failures_out_of_n_are_accounted_exactly() {
        let urls = resource_urls();
        for k in 0..=urls.len() {
            let (manager, host, _) = manager();
            for url in urls.iter().take(k) {
                host.fail_url(url.clone(), StoreError::Http(500));
            }
            let report = block_on(manager.cache_resources(None));
            assert!(report.success);
            assert_eq!(report.cached, urls.len() - k);
            assert_eq!(report.failed, k);
            assert_eq!(report.errors.len(), k);

            let status = manager.cache_status().expect("status");
            assert_eq!(status.result.total, urls.len());
            assert_eq!(status.result.complete, k == 0);
            assert_eq!(manager.is_cached(), k == 0);
        }
    }

    #[test]
    fn mixed_http_and_fetch_failures_record_url_and_message() {
        let urls = resource_urls();
        let (manager, host, _) = manager();
        host.fail_url(urls[1].clone(), StoreError::Http(404));
        host.fail_url(urls[2].clone(), StoreError::Fetch("Network error".to_string()));

        let report = block_on(manager.cache_resources(None));
        assert!(report.success);
        assert_eq!(report.cached, urls.len() - 2);
        assert_eq!(report.failed, 2);
        assert_eq!(
            report.errors,
            vec![
                CacheFailure {
                    url: Some(urls[1].clone()),
                    error: "HTTP 404".to_string(),
                },
                CacheFailure {
                    url: Some(urls[2].clone()),
                    error: "Network error".to_string(),
                },
            ]
        );
        assert!(!manager.is_cached());
        assert!(!manager.cache_status().expect("status").result.complete);
    }

    #[test]
    fn progress_reports_every_attempt_including_failures() {
        let urls = resource_urls();
        let (manager, host, _) = manager();
        host.fail_url(urls[0].clone(), StoreError::Http(503));

        let mut seen = Vec::new();
        let mut progress = |attempted: usize, total: usize| seen.push((attempted, total));
        let report = block_on(manager.cache_resources(Some(&mut progress)));
        assert!(report.success);
        assert_eq!(seen.len(), urls.len());
        assert_eq!(seen.first(), Some(&(1, urls.len())));
        assert_eq!(seen.last(), Some(&(urls.len(), urls.len())));
    }

    #[test]
    fn missing_cache_capability_fails_whole_run_without_fetching() {
        let host = MemoryCacheHost::unsupported();
        let store = KeyValueStore::new(Rc::new(MemoryStorageBackend::default()));
        let manager = OfflineCacheManager::new(Rc::new(host.clone()), store);

        let report = block_on(manager.cache_resources(None));
        assert!(!report.success);
        assert_eq!(report.cached, 0);
        assert_eq!(report.failed, resource_urls().len());
        assert_eq!(
            report.errors,
            vec![CacheFailure {
                url: None,
                error: CACHE_UNAVAILABLE_ERROR.to_string(),
            }]
        );
        assert!(!host.region_exists(RESOURCE_CACHE_NAME));
        // Nothing was persisted for a run that never started.
        assert_eq!(manager.cache_status(), None);
        assert!(!manager.is_cached());
    }

    #[test]
    fn region_open_failure_aborts_the_whole_run() {
        let (manager, host, _) = manager();
        host.fail_open("cache open failed");

        let report = block_on(manager.cache_resources(None));
        assert!(!report.success);
        assert_eq!(report.cached, 0);
        assert_eq!(report.failed, resource_urls().len());
        assert_eq!(
            report.errors,
            vec![CacheFailure {
                url: None,
                error: "cache open failed".to_string(),
            }]
        );
    }

    #[test]
    fn clear_cache_deletes_region_and_status() {
        let (manager, host, _) = manager();
        block_on(manager.cache_resources(None));
        assert!(manager.is_cached());
        assert!(host.region_exists(RESOURCE_CACHE_NAME));

        assert!(block_on(manager.clear_cache()));
        assert!(!host.region_exists(RESOURCE_CACHE_NAME));
        assert_eq!(manager.cache_status(), None);
        assert!(!manager.is_cached());

        // Clearing again tolerates the absent region.
        assert!(block_on(manager.clear_cache()));
    }

    #[test]
    fn is_cached_is_false_before_any_run() {
        let (manager, _, _) = manager();
        assert!(!manager.is_cached());
        assert_eq!(manager.cache_status(), None);
    }

    #[test]
    fn overlapping_runs_are_rejected() {
        let (manager, _, _) = manager();
        manager.in_flight.set(true);
        let report = block_on(manager.cache_resources(None));
        assert!(!report.success);
        assert_eq!(
            report.errors,
            vec![CacheFailure {
                url: None,
                error: CACHE_RUN_IN_FLIGHT_ERROR.to_string(),
            }]
        );

        // The rejected call must not clear the in-flight marker.
        assert!(manager.in_flight.get());
        manager.in_flight.set(false);
        assert!(block_on(manager.cache_resources(None)).success);
    }
}
