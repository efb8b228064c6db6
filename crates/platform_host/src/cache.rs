//! Named cache-region contracts and adapters for offline resource storage.
//!
//! A region stores request/response pairs keyed by URL. The host owns region
//! naming and deletion; a region fetches a URL cross-origin and stores the
//! response, reporting HTTP-status and transport failures separately.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use thiserror::Error;

/// Object-safe boxed future used by [`CacheHost`] and [`CacheRegion`].
pub type ResourceCacheFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Per-resource storage failure, classified at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The resource responded with a non-success HTTP status.
    #[error("HTTP {0}")]
    Http(u16),
    /// The fetch failed before any status was available.
    #[error("{0}")]
    Fetch(String),
}

/// Host capability exposing named cache regions.
pub trait CacheHost {
    /// Whether the platform exposes a cache-storage capability at all.
    fn is_supported(&self) -> bool;

    /// Opens (creating if needed) the named region.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot open the region.
    fn open_region<'a>(
        &'a self,
        name: &'a str,
    ) -> ResourceCacheFuture<'a, Result<Rc<dyn CacheRegion>, String>>;

    /// Deletes the named region, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform delete operation fails.
    fn delete_region<'a>(&'a self, name: &'a str) -> ResourceCacheFuture<'a, Result<bool, String>>;
}

/// One open named cache region.
pub trait CacheRegion {
    /// Fetches `url` cross-origin and stores the response in this region.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on a non-success status and
    /// [`StoreError::Fetch`] when the fetch or store itself fails.
    fn store_url<'a>(&'a self, url: &'a str) -> ResourceCacheFuture<'a, Result<(), StoreError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Cache host for environments without a cache-storage capability.
pub struct NoopCacheHost;

impl CacheHost for NoopCacheHost {
    fn is_supported(&self) -> bool {
        false
    }

    fn open_region<'a>(
        &'a self,
        _name: &'a str,
    ) -> ResourceCacheFuture<'a, Result<Rc<dyn CacheRegion>, String>> {
        Box::pin(async { Err("cache storage unavailable".to_string()) })
    }

    fn delete_region<'a>(&'a self, _name: &'a str) -> ResourceCacheFuture<'a, Result<bool, String>> {
        Box::pin(async { Ok(false) })
    }
}

#[derive(Clone)]
/// Scriptable in-memory cache host for tests.
///
/// Individual URLs can be scripted to fail, and region opening can be
/// scripted to fail as a whole; everything else succeeds and records the
/// stored URLs per region.
pub struct MemoryCacheHost {
    inner: Rc<RefCell<MemoryCacheInner>>,
}

struct MemoryCacheInner {
    supported: bool,
    open_error: Option<String>,
    failures: HashMap<String, StoreError>,
    regions: HashMap<String, Vec<String>>,
}

impl Default for MemoryCacheHost {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryCacheInner {
                supported: true,
                open_error: None,
                failures: HashMap::new(),
                regions: HashMap::new(),
            })),
        }
    }
}

impl MemoryCacheHost {
    /// Builds a host that reports the cache capability as absent.
    pub fn unsupported() -> Self {
        let host = Self::default();
        host.inner.borrow_mut().supported = false;
        host
    }

    /// Scripts every subsequent `open_region` call to fail with `message`.
    pub fn fail_open(&self, message: impl Into<String>) {
        self.inner.borrow_mut().open_error = Some(message.into());
    }

    /// Scripts `url` to fail with `error` on every store attempt.
    pub fn fail_url(&self, url: impl Into<String>, error: StoreError) {
        self.inner.borrow_mut().failures.insert(url.into(), error);
    }

    /// URLs stored in `region` so far, in storage order.
    pub fn stored_urls(&self, region: &str) -> Vec<String> {
        self.inner
            .borrow()
            .regions
            .get(region)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the named region currently exists.
    pub fn region_exists(&self, region: &str) -> bool {
        self.inner.borrow().regions.contains_key(region)
    }
}

impl CacheHost for MemoryCacheHost {
    fn is_supported(&self) -> bool {
        self.inner.borrow().supported
    }

    fn open_region<'a>(
        &'a self,
        name: &'a str,
    ) -> ResourceCacheFuture<'a, Result<Rc<dyn CacheRegion>, String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if let Some(message) = inner.open_error.clone() {
                return Err(message);
            }
            inner.regions.entry(name.to_string()).or_default();
            Ok(Rc::new(MemoryCacheRegion {
                inner: self.inner.clone(),
                name: name.to_string(),
            }) as Rc<dyn CacheRegion>)
        })
    }

    fn delete_region<'a>(&'a self, name: &'a str) -> ResourceCacheFuture<'a, Result<bool, String>> {
        Box::pin(async move { Ok(self.inner.borrow_mut().regions.remove(name).is_some()) })
    }
}

struct MemoryCacheRegion {
    inner: Rc<RefCell<MemoryCacheInner>>,
    name: String,
}

impl CacheRegion for MemoryCacheRegion {
    fn store_url<'a>(&'a self, url: &'a str) -> ResourceCacheFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if let Some(error) = inner.failures.get(url).cloned() {
                return Err(error);
            }
            inner
                .regions
                .entry(self.name.clone())
                .or_default()
                .push(url.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_host_stores_urls_and_deletes_regions() {
        let host = MemoryCacheHost::default();
        let region = block_on(host.open_region("r1")).expect("open");
        block_on(region.store_url("https://a.test/x.pdf")).expect("store");
        assert_eq!(host.stored_urls("r1"), vec!["https://a.test/x.pdf"]);

        assert!(block_on(host.delete_region("r1")).expect("delete"));
        assert!(!host.region_exists("r1"));
        assert!(!block_on(host.delete_region("r1")).expect("delete absent"));
    }

    #[test]
    fn scripted_failures_surface_as_store_errors() {
        let host = MemoryCacheHost::default();
        host.fail_url("https://a.test/missing.pdf", StoreError::Http(404));
        let region = block_on(host.open_region("r1")).expect("open");
        assert_eq!(
            block_on(region.store_url("https://a.test/missing.pdf")),
            Err(StoreError::Http(404))
        );
        assert!(host.stored_urls("r1").is_empty());
    }

    #[test]
    fn store_error_display_matches_reporting_format() {
        assert_eq!(StoreError::Http(404).to_string(), "HTTP 404");
        assert_eq!(
            StoreError::Fetch("Network error".to_string()).to_string(),
            "Network error"
        );
    }

    #[test]
    fn unsupported_and_failed_open_are_distinct() {
        let host = MemoryCacheHost::unsupported();
        assert!(!host.is_supported());

        let failing = MemoryCacheHost::default();
        failing.fail_open("cache open failed");
        assert!(failing.is_supported());
        assert_eq!(
            block_on(failing.open_region("r1")).err(),
            Some("cache open failed".to_string())
        );
    }
}
