//! Typed host-domain contracts and shared models for the offline/install core.
//!
//! This crate is the API-first boundary for the platform capabilities the
//! application consumes: persistent key-value storage, network connectivity
//! observation, cancellable delayed tasks, share/clipboard capabilities,
//! named cache regions, and user-visible notices. Concrete browser adapters
//! live in `platform_host_web`; deterministic in-memory adapters live here
//! for tests and non-browser targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod host;
pub mod network;
pub mod notify;
pub mod share;
pub mod storage;
pub mod time;
pub mod timer;

pub use cache::{
    CacheHost, CacheRegion, MemoryCacheHost, NoopCacheHost, ResourceCacheFuture, StoreError,
};
pub use host::{HostCapabilities, HostServices};
pub use network::{
    wait_for_online, MemoryNetworkObserver, NetworkCallback, NetworkObserver, NetworkSubscription,
    OnlineFuture,
};
pub use notify::{MemoryUserNotifier, NoopUserNotifier, UserNotifier};
pub use share::{
    MemoryShareCapability, NoopShareCapability, ShareCapability, ShareFailure, ShareFuture,
    ShareRequest,
};
pub use storage::{
    KeyValueStore, MemoryStorageBackend, NoopStorageBackend, StorageBackend, STORAGE_PREFIX,
};
pub use time::unix_time_ms_now;
pub use timer::{DelayHandle, DelayScheduler, ManualDelayScheduler};
