//! Cache API-backed resource cache host.
//!
//! Resources are fetched cross-origin and stored as request/response pairs
//! in a named cache, so the service worker can serve them while offline.

use std::rc::Rc;

use platform_host::{CacheHost, CacheRegion, ResourceCacheFuture};

#[cfg(target_arch = "wasm32")]
use platform_host::StoreError;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, Copy, Default)]
/// Browser cache host over `window.caches`.
pub struct WebCacheHost;

#[cfg(target_arch = "wasm32")]
fn js_error_string(error: JsValue) -> String {
    js_sys::Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{error:?}"))
}

#[cfg(target_arch = "wasm32")]
fn cache_storage() -> Result<web_sys::CacheStorage, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    if !js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("caches")).unwrap_or(false) {
        return Err("cache storage unavailable".to_string());
    }
    window.caches().map_err(js_error_string)
}

impl CacheHost for WebCacheHost {
    fn is_supported(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .map(|w| {
                    js_sys::Reflect::has(w.as_ref(), &JsValue::from_str("caches"))
                        .unwrap_or(false)
                })
                .unwrap_or(false)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn open_region<'a>(
        &'a self,
        name: &'a str,
    ) -> ResourceCacheFuture<'a, Result<Rc<dyn CacheRegion>, String>> {
        #[cfg(target_arch = "wasm32")]
        {
            Box::pin(async move {
                let caches = cache_storage()?;
                let value = JsFuture::from(caches.open(name))
                    .await
                    .map_err(js_error_string)?;
                let cache: web_sys::Cache = value
                    .dyn_into()
                    .map_err(|_| "caches.open returned an unexpected object".to_string())?;
                Ok(Rc::new(WebCacheRegion { cache }) as Rc<dyn CacheRegion>)
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = name;
            Box::pin(async { Err("cache storage unavailable".to_string()) })
        }
    }

    fn delete_region<'a>(&'a self, name: &'a str) -> ResourceCacheFuture<'a, Result<bool, String>> {
        #[cfg(target_arch = "wasm32")]
        {
            Box::pin(async move {
                let caches = cache_storage()?;
                let value = JsFuture::from(caches.delete(name))
                    .await
                    .map_err(js_error_string)?;
                Ok(value.as_bool().unwrap_or(false))
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = name;
            Box::pin(async { Ok(false) })
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct WebCacheRegion {
    cache: web_sys::Cache,
}

#[cfg(target_arch = "wasm32")]
impl CacheRegion for WebCacheRegion {
    fn store_url<'a>(&'a self, url: &'a str) -> ResourceCacheFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let window = web_sys::window()
                .ok_or_else(|| StoreError::Fetch("no window".to_string()))?;
            let init = web_sys::RequestInit::new();
            init.set_mode(web_sys::RequestMode::Cors);
            let value = JsFuture::from(window.fetch_with_str_and_init(url, &init))
                .await
                .map_err(|e| StoreError::Fetch(js_error_string(e)))?;
            let response: web_sys::Response = value
                .dyn_into()
                .map_err(|_| StoreError::Fetch("fetch returned an unexpected object".to_string()))?;
            if !response.ok() {
                return Err(StoreError::Http(response.status()));
            }
            let put = self
                .cache
                .put_with_str(url, &response)
                .map_err(|e| StoreError::Fetch(js_error_string(e)))?;
            JsFuture::from(put)
                .await
                .map(|_| ())
                .map_err(|e| StoreError::Fetch(js_error_string(e)))
        })
    }
}
