//! DOM event listener registration with drop-cleanup.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// Registration handle for a DOM event listener. Detaches on drop.
pub struct EventBinding {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl EventBinding {
    /// Builds a binding around a cleanup closure.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Binding that was never registered anywhere.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Removes the listener. Idempotent.
    pub fn detach(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Attaches `handler` for `event_type` on `target`; the returned binding
/// owns the closure and detaches the listener when dropped.
#[cfg(target_arch = "wasm32")]
pub(crate) fn bind_event(
    target: &web_sys::EventTarget,
    event_type: &'static str,
    handler: Closure<dyn FnMut(web_sys::Event)>,
) -> EventBinding {
    if let Err(error) =
        target.add_event_listener_with_callback(event_type, handler.as_ref().unchecked_ref())
    {
        log::warn!("{event_type} listener registration failed: {error:?}");
        return EventBinding::noop();
    }
    let target = target.clone();
    EventBinding::new(move || {
        let _ = target
            .remove_event_listener_with_callback(event_type, handler.as_ref().unchecked_ref());
    })
}
