//! Host service bundle and capability snapshot for runtime composition.

use std::rc::Rc;

use crate::{
    CacheHost, DelayScheduler, NetworkObserver, ShareCapability, StorageBackend, UserNotifier,
};

/// Host availability snapshot for the optional capability domains this core
/// consumes.
///
/// Intentionally coarse-grained so runtime wiring can branch on capability
/// posture without importing adapter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Native share sheet availability.
    pub native_share: bool,
    /// Clipboard write availability.
    pub clipboard: bool,
    /// Cache-storage availability.
    pub cache_storage: bool,
    /// Persistent key-value storage availability.
    pub persistent_storage: bool,
}

impl HostCapabilities {
    /// Posture with every capability absent.
    pub const fn none() -> Self {
        Self {
            native_share: false,
            clipboard: false,
            cache_storage: false,
            persistent_storage: false,
        }
    }
}

/// Runtime-selected host service bundle injected into the offline core.
///
/// All environment-specific adapter selection happens before this bundle
/// crosses into the runtime crate, which keeps the domain logic decoupled
/// from browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Raw persistent key-value storage.
    pub storage: Rc<dyn StorageBackend>,
    /// Connectivity snapshot and transition source.
    pub network: Rc<dyn NetworkObserver>,
    /// One-shot delayed task scheduler.
    pub scheduler: Rc<dyn DelayScheduler>,
    /// Share sheet / clipboard capability.
    pub share: Rc<dyn ShareCapability>,
    /// Named cache-region host.
    pub cache: Rc<dyn CacheHost>,
    /// Blocking user-notice sink.
    pub notifier: Rc<dyn UserNotifier>,
    /// Availability snapshot for the above capabilities.
    pub capabilities: HostCapabilities,
}
