//! Service-worker update watching and activation.
//!
//! A new app version reaches the `waiting` state once its service worker has
//! installed behind the active one. The watcher reports that state; applying
//! the update asks the waiting worker to skip waiting and reloads the page
//! when it takes control.

use crate::events::EventBinding;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

#[cfg(target_arch = "wasm32")]
fn service_worker_container() -> Result<web_sys::ServiceWorkerContainer, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let navigator = window.navigator();
    if !js_sys::Reflect::has(navigator.as_ref(), &JsValue::from_str("serviceWorker"))
        .unwrap_or(false)
    {
        return Err("service workers unavailable".to_string());
    }
    Ok(navigator.service_worker())
}

#[cfg(target_arch = "wasm32")]
async fn ready_registration() -> Result<web_sys::ServiceWorkerRegistration, String> {
    let container = service_worker_container()?;
    let value = JsFuture::from(container.ready().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    value
        .dyn_into()
        .map_err(|_| "serviceWorker.ready returned an unexpected object".to_string())
}

/// Watches the active registration and invokes `on_waiting` whenever a new
/// version reaches the waiting state, including one already waiting at call
/// time. Dropping the binding stops the watch.
///
/// # Errors
///
/// Returns an error when service workers are unavailable or the active
/// registration cannot be obtained.
pub async fn watch_for_waiting_update(
    on_waiting: impl Fn() + 'static,
) -> Result<EventBinding, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use std::rc::Rc;

        let registration = ready_registration().await?;
        let on_waiting = Rc::new(on_waiting);
        if registration.waiting().is_some() {
            on_waiting();
        }

        let watched = registration.clone();
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let Some(installing) = watched.installing() else {
                return;
            };
            let worker = installing.clone();
            let on_waiting = on_waiting.clone();
            let statechange =
                Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                    // Installed behind an active controller means waiting;
                    // first-ever installs have no controller and activate
                    // directly.
                    let controlled = service_worker_container()
                        .map(|c| c.controller().is_some())
                        .unwrap_or(false);
                    if worker.state() == web_sys::ServiceWorkerState::Installed && controlled {
                        on_waiting();
                    }
                });
            if let Err(error) = installing.add_event_listener_with_callback(
                "statechange",
                statechange.as_ref().unchecked_ref(),
            ) {
                log::warn!("statechange listener registration failed: {error:?}");
            }
            // Leaked deliberately: the listener must outlive this handler
            // call and dies with the transient installing worker.
            statechange.forget();
        });
        Ok(crate::events::bind_event(
            registration.as_ref(),
            "updatefound",
            handler,
        ))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = on_waiting;
        Err("service workers unavailable".to_string())
    }
}

/// Asks the waiting service worker to activate and reloads the page once it
/// takes control.
///
/// # Errors
///
/// Returns an error when no update is waiting or the worker message fails.
pub async fn apply_waiting_update() -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let registration = ready_registration().await?;
        let waiting = registration
            .waiting()
            .ok_or_else(|| "no update is waiting".to_string())?;

        let container = service_worker_container()?;
        let reload = Closure::once(move || {
            if let Some(window) = web_sys::window() {
                if let Err(error) = window.location().reload() {
                    log::warn!("reload after update failed: {error:?}");
                }
            }
        });
        if let Err(error) = container
            .add_event_listener_with_callback("controllerchange", reload.as_ref().unchecked_ref())
        {
            log::warn!("controllerchange listener registration failed: {error:?}");
        }
        // Leaked deliberately: the page reloads when this fires.
        reload.forget();

        let message = js_sys::Object::new();
        js_sys::Reflect::set(
            &message,
            &JsValue::from_str("type"),
            &JsValue::from_str("SKIP_WAITING"),
        )
        .map_err(|e| format!("{e:?}"))?;
        waiting
            .post_message(&message)
            .map_err(|e| format!("{e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Err("service workers unavailable".to_string())
    }
}
