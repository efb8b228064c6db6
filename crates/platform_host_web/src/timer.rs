//! `setTimeout`-backed delay scheduler.

use platform_host::{DelayHandle, DelayScheduler};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, Copy, Default)]
/// Browser delay scheduler backed by `window.setTimeout`.
pub struct WebDelayScheduler;

impl DelayScheduler for WebDelayScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> DelayHandle {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return DelayHandle::new(|| ());
            };
            let closure = Closure::once(task);
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms as i32,
            ) {
                // The cancel closure owns the callback, keeping it alive
                // until the timer fires or the handle is dropped.
                Ok(id) => DelayHandle::new(move || {
                    if let Some(window) = web_sys::window() {
                        window.clear_timeout_with_handle(id);
                    }
                    drop(closure);
                }),
                Err(error) => {
                    log::warn!("setTimeout failed: {error:?}");
                    DelayHandle::new(|| ())
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (delay_ms, task);
            DelayHandle::new(|| ())
        }
    }
}
