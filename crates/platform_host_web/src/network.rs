//! `navigator.onLine` and online/offline event observation.

use platform_host::{NetworkCallback, NetworkObserver, NetworkSubscription};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, Copy, Default)]
/// Browser connectivity observer over the `online`/`offline` window events.
pub struct WebNetworkObserver;

impl NetworkObserver for WebNetworkObserver {
    fn is_online(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .map(|w| w.navigator().on_line())
                .unwrap_or(true)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            true
        }
    }

    fn subscribe(&self, callback: NetworkCallback) -> NetworkSubscription {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return NetworkSubscription::noop();
            };
            let online_callback = callback.clone();
            let online = Closure::<dyn FnMut()>::new(move || online_callback(true));
            let offline = Closure::<dyn FnMut()>::new(move || callback(false));
            let registered = window
                .add_event_listener_with_callback("online", online.as_ref().unchecked_ref())
                .and_then(|()| {
                    window.add_event_listener_with_callback(
                        "offline",
                        offline.as_ref().unchecked_ref(),
                    )
                });
            if let Err(error) = registered {
                log::warn!("connectivity listener registration failed: {error:?}");
                return NetworkSubscription::noop();
            }
            // The cleanup closure owns both callbacks for the subscription
            // lifetime and drops them after deregistering.
            NetworkSubscription::new(move || {
                if let Some(window) = web_sys::window() {
                    let _ = window.remove_event_listener_with_callback(
                        "online",
                        online.as_ref().unchecked_ref(),
                    );
                    let _ = window.remove_event_listener_with_callback(
                        "offline",
                        offline.as_ref().unchecked_ref(),
                    );
                }
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = callback;
            NetworkSubscription::noop()
        }
    }
}
