//! `beforeinstallprompt` capture and standalone display-mode detection.
//!
//! The browser fires `beforeinstallprompt` when the app becomes installable.
//! The listener suppresses the default mini-infobar and hands the event to
//! the callback as an [`InstallToken`]; invoking the token replays the
//! prompt and reports the user's choice.

use crate::events::EventBinding;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

/// Captured install-prompt event. Consumed by a single prompt invocation.
pub struct InstallToken {
    #[cfg(target_arch = "wasm32")]
    event: JsValue,
}

impl InstallToken {
    /// Replays the captured prompt and resolves with whether the user
    /// accepted installation.
    ///
    /// # Errors
    ///
    /// Returns an error when the prompt cannot be invoked or the choice
    /// cannot be read back.
    pub async fn prompt_and_wait(self) -> Result<bool, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let prompt = js_sys::Reflect::get(&self.event, &JsValue::from_str("prompt"))
                .map_err(|e| format!("{e:?}"))?
                .dyn_into::<js_sys::Function>()
                .map_err(|_| "install event has no prompt()".to_string())?;
            prompt.call0(&self.event).map_err(|e| format!("{e:?}"))?;

            let choice = js_sys::Reflect::get(&self.event, &JsValue::from_str("userChoice"))
                .map_err(|e| format!("{e:?}"))?
                .dyn_into::<js_sys::Promise>()
                .map_err(|_| "install event has no userChoice".to_string())?;
            let resolved = JsFuture::from(choice).await.map_err(|e| format!("{e:?}"))?;
            let outcome = js_sys::Reflect::get(&resolved, &JsValue::from_str("outcome"))
                .ok()
                .and_then(|v| v.as_string());
            Ok(outcome.as_deref() == Some("accepted"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Err("install prompt unavailable".to_string())
        }
    }
}

/// Captures `beforeinstallprompt` events, suppressing the browser's default
/// prompt and passing the token to `callback`. Dropping the binding stops
/// the capture.
pub fn on_install_signal(callback: impl Fn(InstallToken) + 'static) -> EventBinding {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return EventBinding::noop();
        };
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            callback(InstallToken {
                event: event.into(),
            });
        });
        crate::events::bind_event(window.as_ref(), "beforeinstallprompt", handler)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = callback;
        EventBinding::noop()
    }
}

/// Whether the app is running as an installed app rather than a browser tab.
///
/// Checks the `display-mode: standalone` media query, plus the nonstandard
/// `navigator.standalone` flag iOS Safari sets instead.
pub fn is_standalone() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let display_mode = window
            .match_media("(display-mode: standalone)")
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false);
        let ios_standalone =
            js_sys::Reflect::get(window.navigator().as_ref(), &JsValue::from_str("standalone"))
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
        display_mode || ios_standalone
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}
