//! `window.alert`-backed user notifier.

use platform_host::UserNotifier;

#[derive(Debug, Clone, Copy, Default)]
/// Browser notifier delivering blocking alert dialogs.
pub struct WebUserNotifier;

impl UserNotifier for WebUserNotifier {
    fn notify(&self, message: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                if let Err(error) = window.alert_with_message(message) {
                    log::warn!("alert failed: {error:?}");
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = message;
        }
    }
}
