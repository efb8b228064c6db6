//! Web Share API and async clipboard capability.
//!
//! Browser error objects are classified here so the runtime dispatcher only
//! sees [`ShareFailure`] variants: `AbortError` is a user dismissal,
//! `NotAllowedError` a permission denial, anything else an opaque failure.

use platform_host::{ShareCapability, ShareFailure, ShareFuture, ShareRequest};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, Copy, Default)]
/// Browser share capability over `navigator.share` and `navigator.clipboard`.
pub struct WebShareCapability;

/// Share-sheet body text used when the request carries none.
const DEFAULT_SHARE_TEXT: &str = "Know Your Rights";

/// Resolves the share-sheet title and text, defaulting omitted fields to
/// the page title and the fixed app text.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn effective_share_fields(request: &ShareRequest, page_title: Option<String>) -> (String, String) {
    let title = request.title.clone().or(page_title).unwrap_or_default();
    let text = request
        .text
        .clone()
        .unwrap_or_else(|| DEFAULT_SHARE_TEXT.to_string());
    (title, text)
}

/// Mobile user-agent check used to prefer the native share sheet.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn is_mobile_user_agent(user_agent: &str) -> bool {
    ["iPhone", "iPad", "iPod", "Android"]
        .iter()
        .any(|token| user_agent.contains(token))
}

#[cfg(target_arch = "wasm32")]
fn navigator() -> Option<web_sys::Navigator> {
    web_sys::window().map(|w| w.navigator())
}

#[cfg(target_arch = "wasm32")]
fn navigator_has(property: &str) -> bool {
    navigator()
        .map(|nav| js_sys::Reflect::has(nav.as_ref(), &JsValue::from_str(property)).unwrap_or(false))
        .unwrap_or(false)
}

#[cfg(target_arch = "wasm32")]
fn classify_js_failure(error: JsValue) -> ShareFailure {
    let name = js_sys::Reflect::get(&error, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string());
    match name.as_deref() {
        Some("AbortError") => ShareFailure::Cancelled,
        Some("NotAllowedError") => ShareFailure::PermissionDenied,
        _ => {
            let message = js_sys::Reflect::get(&error, &JsValue::from_str("message"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| format!("{error:?}"));
            ShareFailure::Other(message)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn document_title() -> Option<String> {
    web_sys::window()?.document().map(|d| d.title())
}

#[cfg(target_arch = "wasm32")]
fn share_data(request: &ShareRequest) -> Result<js_sys::Object, ShareFailure> {
    let (title, text) = effective_share_fields(request, document_title());
    let data = js_sys::Object::new();
    let set = |key: &str, value: &str| {
        js_sys::Reflect::set(&data, &JsValue::from_str(key), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(classify_js_failure)
    };
    set("url", &request.url)?;
    set("title", &title)?;
    set("text", &text)?;
    Ok(data)
}

impl ShareCapability for WebShareCapability {
    fn supports_native_share(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            navigator_has("share")
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn supports_clipboard(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            navigator_has("clipboard")
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn prefers_native_share(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            navigator()
                .and_then(|nav| nav.user_agent().ok())
                .map(|ua| is_mobile_user_agent(&ua))
                .unwrap_or(false)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn native_share<'a>(
        &'a self,
        request: &'a ShareRequest,
    ) -> ShareFuture<'a, Result<(), ShareFailure>> {
        #[cfg(target_arch = "wasm32")]
        {
            Box::pin(async move {
                let nav = navigator()
                    .ok_or_else(|| ShareFailure::Other("no window".to_string()))?;
                let share_fn = js_sys::Reflect::get(nav.as_ref(), &JsValue::from_str("share"))
                    .map_err(classify_js_failure)?
                    .dyn_into::<js_sys::Function>()
                    .map_err(|_| ShareFailure::Other("Share API unavailable".to_string()))?;
                let data = share_data(request)?;
                let promise = share_fn
                    .call1(nav.as_ref(), &data)
                    .map_err(classify_js_failure)?
                    .dyn_into::<js_sys::Promise>()
                    .map_err(|_| ShareFailure::Other("share() returned no promise".to_string()))?;
                JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(classify_js_failure)
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = request;
            Box::pin(async { Err(ShareFailure::Other("share capability unavailable".to_string())) })
        }
    }

    fn copy_text<'a>(&'a self, text: &'a str) -> ShareFuture<'a, Result<(), ShareFailure>> {
        #[cfg(target_arch = "wasm32")]
        {
            Box::pin(async move {
                let nav = navigator()
                    .ok_or_else(|| ShareFailure::Other("no window".to_string()))?;
                if !navigator_has("clipboard") {
                    return Err(ShareFailure::Other("Clipboard API unavailable".to_string()));
                }
                JsFuture::from(nav.clipboard().write_text(text))
                    .await
                    .map(|_| ())
                    .map_err(classify_js_failure)
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = text;
            Box::pin(async {
                Err(ShareFailure::Other("clipboard capability unavailable".to_string()))
            })
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn mobile_user_agents_prefer_the_share_sheet() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"
        ));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)"
        ));
    }

    #[test]
    fn bare_url_share_defaults_to_page_title_and_app_text() {
        let request = ShareRequest::for_url("https://redcards.accessi.tech/");
        let (title, text) =
            effective_share_fields(&request, Some("Red Cards".to_string()));
        assert_eq!(title, "Red Cards");
        assert_eq!(text, DEFAULT_SHARE_TEXT);

        // No page title degrades to an empty title, never an absent field.
        let (title, _) = effective_share_fields(&request, None);
        assert_eq!(title, "");
    }

    #[test]
    fn explicit_fields_override_the_defaults() {
        let request = ShareRequest {
            url: "https://redcards.accessi.tech/".to_string(),
            title: Some("Custom title".to_string()),
            text: Some("Custom text".to_string()),
        };
        let (title, text) =
            effective_share_fields(&request, Some("Red Cards".to_string()));
        assert_eq!(title, "Custom title");
        assert_eq!(text, "Custom text");
    }
}
