//! Offline core facade composing the domain managers over one host bundle.

use std::rc::Rc;

use platform_host::{
    wait_for_online, DelayScheduler, HostCapabilities, HostServices, KeyValueStore,
    NetworkObserver, OnlineFuture,
};

use crate::cache_manager::OfflineCacheManager;
use crate::coordinator::SaveContext;
use crate::share::{ShareDispatcher, SharePolicy};

/// Entry point wiring the cache manager, share dispatcher, and connectivity
/// helpers onto a single injected [`HostServices`] bundle.
pub struct OfflineCore {
    store: KeyValueStore,
    cache: OfflineCacheManager,
    share: ShareDispatcher,
    network: Rc<dyn NetworkObserver>,
    scheduler: Rc<dyn DelayScheduler>,
    capabilities: HostCapabilities,
}

impl OfflineCore {
    /// Composes the core over the host bundle with the default share policy.
    pub fn new(services: &HostServices) -> Self {
        Self::with_share_policy(services, SharePolicy::default())
    }

    /// Composes the core with an explicit share policy.
    pub fn with_share_policy(services: &HostServices, policy: SharePolicy) -> Self {
        let store = KeyValueStore::new(services.storage.clone());
        Self {
            cache: OfflineCacheManager::new(services.cache.clone(), store.clone()),
            share: ShareDispatcher::new(services.share.clone(), services.notifier.clone())
                .with_policy(policy),
            store,
            network: services.network.clone(),
            scheduler: services.scheduler.clone(),
            capabilities: services.capabilities,
        }
    }

    /// Prefixed persistent key-value store.
    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    /// Offline resource cache manager.
    pub fn cache(&self) -> &OfflineCacheManager {
        &self.cache
    }

    /// Share/clipboard dispatcher.
    pub fn share(&self) -> &ShareDispatcher {
        &self.share
    }

    /// Host capability snapshot taken at composition time.
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Current connectivity snapshot.
    pub fn is_online(&self) -> bool {
        self.network.is_online()
    }

    /// Resolves `true` once online, or `false` when `timeout_ms` elapses.
    pub fn wait_for_online(&self, timeout_ms: Option<u32>) -> OnlineFuture {
        wait_for_online(&self.network, &self.scheduler, timeout_ms)
    }

    /// Environment snapshot for the save/install gesture.
    pub fn save_context(&self, standalone: bool) -> SaveContext {
        SaveContext {
            standalone,
            online: self.is_online(),
            already_cached: self.cache.is_cached(),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{
        MemoryCacheHost, MemoryNetworkObserver, MemoryShareCapability, MemoryStorageBackend,
        MemoryUserNotifier, ManualDelayScheduler,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    struct Harness {
        network: MemoryNetworkObserver,
        core: OfflineCore,
    }

    fn harness(online: bool) -> Harness {
        let network = MemoryNetworkObserver::new(online);
        let services = HostServices {
            storage: Rc::new(MemoryStorageBackend::default()),
            network: Rc::new(network.clone()),
            scheduler: Rc::new(ManualDelayScheduler::default()),
            share: Rc::new(MemoryShareCapability::default()),
            cache: Rc::new(MemoryCacheHost::default()),
            notifier: Rc::new(MemoryUserNotifier::default()),
            capabilities: HostCapabilities {
                native_share: false,
                clipboard: true,
                cache_storage: true,
                persistent_storage: true,
            },
        };
        Harness {
            network,
            core: OfflineCore::new(&services),
        }
    }

    #[test]
    fn save_context_reflects_connectivity_and_cache_state() {
        let h = harness(true);
        let context = h.core.save_context(true);
        assert_eq!(
            context,
            SaveContext {
                standalone: true,
                online: true,
                already_cached: false,
            }
        );

        let report = block_on(h.core.cache().cache_resources(None));
        assert!(report.success);
        h.network.set_online(false);

        let context = h.core.save_context(false);
        assert_eq!(
            context,
            SaveContext {
                standalone: false,
                online: false,
                already_cached: true,
            }
        );
    }

    #[test]
    fn connectivity_passes_through_the_observer() {
        let h = harness(false);
        assert!(!h.core.is_online());
        h.network.set_online(true);
        assert!(h.core.is_online());
        assert!(block_on(h.core.wait_for_online(None)));
    }

    #[test]
    fn capabilities_snapshot_is_preserved() {
        let h = harness(true);
        assert!(h.core.capabilities().clipboard);
        assert!(!h.core.capabilities().native_share);
    }
}
