//! `localStorage`-backed storage implementation.
//!
//! This adapter is intentionally small and synchronous at the browser API
//! boundary; key prefixing and JSON handling live in
//! [`platform_host::KeyValueStore`] above it.

use platform_host::StorageBackend;

#[derive(Debug, Clone, Copy, Default)]
/// Browser storage backend backed by `window.localStorage`.
pub struct WebStorageBackend;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl StorageBackend for WebStorageBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove_raw(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            let length = storage
                .length()
                .map_err(|e| format!("localStorage length failed: {e:?}"))?;
            let mut keys = Vec::with_capacity(length as usize);
            for index in 0..length {
                if let Ok(Some(key)) = storage.key(index) {
                    keys.push(key);
                }
            }
            Ok(keys)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(Vec::new())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn non_browser_stub_reads_nothing_and_accepts_writes() {
        let backend = WebStorageBackend;
        assert_eq!(backend.get_raw("k"), Ok(None));
        assert_eq!(backend.set_raw("k", "v"), Ok(()));
        assert_eq!(backend.remove_raw("k"), Ok(()));
        assert_eq!(backend.keys(), Ok(Vec::new()));
    }
}
