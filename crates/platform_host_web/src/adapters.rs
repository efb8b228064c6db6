//! Concrete browser adapter factories for runtime wiring.

use std::rc::Rc;

use platform_host::{CacheHost, HostCapabilities, HostServices, KeyValueStore, ShareCapability};

use crate::{
    WebCacheHost, WebDelayScheduler, WebNetworkObserver, WebShareCapability, WebStorageBackend,
    WebUserNotifier,
};

/// Probes the running browser and returns its capability posture.
pub fn host_capabilities() -> HostCapabilities {
    let share = WebShareCapability;
    HostCapabilities {
        native_share: share.supports_native_share(),
        clipboard: share.supports_clipboard(),
        cache_storage: WebCacheHost.is_supported(),
        persistent_storage: KeyValueStore::new(Rc::new(WebStorageBackend)).is_available(),
    }
}

/// Builds the full browser-backed host service bundle.
pub fn build_host_services() -> HostServices {
    HostServices {
        storage: Rc::new(WebStorageBackend),
        network: Rc::new(WebNetworkObserver),
        scheduler: Rc::new(WebDelayScheduler),
        share: Rc::new(WebShareCapability),
        cache: Rc::new(WebCacheHost),
        notifier: Rc::new(WebUserNotifier),
        capabilities: host_capabilities(),
    }
}
