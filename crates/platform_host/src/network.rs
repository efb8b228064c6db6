//! Network connectivity observation contracts and the wait-for-online
//! helper.
//!
//! The platform owns the online/offline state; observers only relay it.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use futures::channel::oneshot;

use crate::timer::{DelayHandle, DelayScheduler};

/// Callback invoked with `true` on online transitions and `false` on
/// offline transitions.
pub type NetworkCallback = Rc<dyn Fn(bool)>;

/// Boxed future resolving to the eventual online outcome.
pub type OnlineFuture = Pin<Box<dyn Future<Output = bool>>>;

/// Host service reporting connectivity and relaying its transitions.
pub trait NetworkObserver {
    /// Snapshot of the platform connectivity state.
    fn is_online(&self) -> bool;

    /// Registers `callback` for connectivity transitions. The returned
    /// subscription stops delivery when unsubscribed or dropped.
    fn subscribe(&self, callback: NetworkCallback) -> NetworkSubscription;
}

/// Registration handle for a connectivity callback. Unsubscribes on drop.
pub struct NetworkSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl NetworkSubscription {
    /// Builds a subscription around a cleanup closure.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription that was never registered anywhere.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Removes the registration. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for NetworkSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[derive(Clone)]
/// In-memory connectivity source for tests; transitions are dispatched
/// explicitly through [`MemoryNetworkObserver::set_online`].
pub struct MemoryNetworkObserver {
    inner: Rc<MemoryNetworkInner>,
}

struct MemoryNetworkInner {
    online: Cell<bool>,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<u64, NetworkCallback>>,
}

impl MemoryNetworkObserver {
    /// Builds an observer with the given initial connectivity.
    pub fn new(online: bool) -> Self {
        Self {
            inner: Rc::new(MemoryNetworkInner {
                online: Cell::new(online),
                next_id: Cell::new(0),
                listeners: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Sets the connectivity state and dispatches one transition event to
    /// every live subscriber.
    pub fn set_online(&self, online: bool) {
        self.inner.online.set(online);
        // Snapshot first: callbacks may unsubscribe during dispatch.
        let callbacks: Vec<NetworkCallback> =
            self.inner.listeners.borrow().values().cloned().collect();
        for callback in callbacks {
            callback(online);
        }
    }

    /// Number of live subscriptions, for listener-leak assertions.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl NetworkObserver for MemoryNetworkObserver {
    fn is_online(&self) -> bool {
        self.inner.online.get()
    }

    fn subscribe(&self, callback: NetworkCallback) -> NetworkSubscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().insert(id, callback);
        let inner = self.inner.clone();
        NetworkSubscription::new(move || {
            inner.listeners.borrow_mut().remove(&id);
        })
    }
}

struct WaitState {
    sender: Option<oneshot::Sender<bool>>,
    subscription: Option<NetworkSubscription>,
    timeout: Option<DelayHandle>,
}

fn settle(state: &Rc<RefCell<WaitState>>, online: bool) {
    let mut state = state.borrow_mut();
    if let Some(mut subscription) = state.subscription.take() {
        subscription.unsubscribe();
    }
    if let Some(mut timeout) = state.timeout.take() {
        timeout.cancel();
    }
    if let Some(sender) = state.sender.take() {
        let _ = sender.send(online);
    }
}

/// Resolves `true` once the network is online, or `false` when `timeout_ms`
/// elapses first.
///
/// Resolves immediately when already online. Exactly one resolution occurs,
/// and both the transition subscription and the timeout task are torn down
/// before resolving, whichever path wins.
pub fn wait_for_online(
    network: &Rc<dyn NetworkObserver>,
    scheduler: &Rc<dyn DelayScheduler>,
    timeout_ms: Option<u32>,
) -> OnlineFuture {
    if network.is_online() {
        return Box::pin(async { true });
    }

    let (sender, receiver) = oneshot::channel::<bool>();
    let state = Rc::new(RefCell::new(WaitState {
        sender: Some(sender),
        subscription: None,
        timeout: None,
    }));

    let on_change = {
        let state = state.clone();
        Rc::new(move |online: bool| {
            if online {
                settle(&state, true);
            }
        })
    };
    let subscription = network.subscribe(on_change);
    state.borrow_mut().subscription = Some(subscription);

    if let Some(delay_ms) = timeout_ms {
        let on_timeout = {
            let state = state.clone();
            Box::new(move || settle(&state, false))
        };
        let handle = scheduler.schedule(delay_ms, on_timeout);
        state.borrow_mut().timeout = Some(handle);
    }

    Box::pin(async move { receiver.await.unwrap_or(false) })
}
