//! Offline and install runtime for the red cards app.
//!
//! Headless domain logic over the [`platform_host`] contracts: the persisted
//! key-value conventions, offline resource caching, share dispatch, and the
//! install/update prompt coordinator. Everything here runs against injected
//! host services, so the whole crate is testable off-browser with the
//! in-memory adapters.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cache_manager;
pub mod coordinator;
pub mod notice;
pub mod offline;
pub mod resources;
pub mod share;

pub use cache_manager::{
    CacheFailure, CacheRunReport, CacheRunResult, CacheStatus, OfflineCacheManager, ProgressFn,
    CACHE_RUN_IN_FLIGHT_ERROR, CACHE_STATUS_KEY, CACHE_TIMESTAMP_KEY, CACHE_UNAVAILABLE_ERROR,
};
pub use coordinator::{
    reduce_prompts, InstallPromptSlot, PromptAction, PromptEffect, PromptNotice, PromptState,
    SaveContext,
};
pub use notice::{TransientNotice, NOTICE_DURATION_MS};
pub use offline::OfflineCore;
pub use resources::{resource_urls, RED_CARD_PRINT_LINKS, RESOURCE_CACHE_NAME};
pub use share::{
    ShareCallback, ShareDispatcher, ShareOutcome, SharePolicy, COPIED_MESSAGE,
    GENERIC_SHARE_ERROR, PERMISSION_DENIED_MESSAGE, SHARED_MESSAGE,
};
