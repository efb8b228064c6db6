//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for storage,
//! connectivity, timers, share/clipboard, the offline resource cache, user
//! notices, install-prompt capture, and service-worker updates. Every
//! adapter compiles off-`wasm32` with benign stub behavior so the runtime
//! crates build and test on native targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod adapters;
pub mod cache;
pub mod events;
pub mod install;
pub mod network;
pub mod notify;
pub mod share;
pub mod storage;
pub mod timer;
pub mod update;

pub use adapters::{build_host_services, host_capabilities};
pub use cache::WebCacheHost;
pub use events::EventBinding;
pub use install::{is_standalone, on_install_signal, InstallToken};
pub use network::WebNetworkObserver;
pub use notify::WebUserNotifier;
pub use share::WebShareCapability;
pub use storage::WebStorageBackend;
pub use timer::WebDelayScheduler;
pub use update::{apply_waiting_update, watch_for_waiting_update};
