//! Share and clipboard capability contracts and adapters.
//!
//! Failure classification happens at the adapter boundary: platform error
//! shapes (abort, permission) are mapped to [`ShareFailure`] variants so the
//! dispatcher never inspects platform error objects.

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::Pin, rc::Rc};

use thiserror::Error;

/// Object-safe boxed future used by [`ShareCapability`] async methods.
pub type ShareFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Classified share/clipboard failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareFailure {
    /// The user dismissed the native share sheet. Not an error.
    #[error("share cancelled by user")]
    Cancelled,
    /// The platform denied share or clipboard permission.
    #[error("share or clipboard permission denied")]
    PermissionDenied,
    /// Any other platform failure, with the underlying message when one was
    /// available.
    #[error("{0}")]
    Other(String),
}

/// Payload offered to the platform share sheet or clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareRequest {
    /// Link being shared. The clipboard path copies exactly this string.
    pub url: String,
    /// Optional share-sheet title.
    pub title: Option<String>,
    /// Optional share-sheet body text.
    pub text: Option<String>,
}

impl ShareRequest {
    /// Builds a request for `url` with no title or text.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Host capability for sharing a link, by native share sheet or clipboard.
pub trait ShareCapability {
    /// Whether the platform exposes a native share sheet.
    fn supports_native_share(&self) -> bool;

    /// Whether the platform exposes a clipboard write capability.
    fn supports_clipboard(&self) -> bool;

    /// Policy predicate: whether this environment prefers the native share
    /// sheet (mobile contexts on the web).
    fn prefers_native_share(&self) -> bool;

    /// Opens the native share sheet for `request`.
    fn native_share<'a>(
        &'a self,
        request: &'a ShareRequest,
    ) -> ShareFuture<'a, Result<(), ShareFailure>>;

    /// Writes `text` to the platform clipboard.
    fn copy_text<'a>(&'a self, text: &'a str) -> ShareFuture<'a, Result<(), ShareFailure>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Share capability for environments with neither share sheet nor clipboard.
pub struct NoopShareCapability;

impl ShareCapability for NoopShareCapability {
    fn supports_native_share(&self) -> bool {
        false
    }

    fn supports_clipboard(&self) -> bool {
        false
    }

    fn prefers_native_share(&self) -> bool {
        false
    }

    fn native_share<'a>(
        &'a self,
        _request: &'a ShareRequest,
    ) -> ShareFuture<'a, Result<(), ShareFailure>> {
        Box::pin(async { Err(ShareFailure::Other("share capability unavailable".to_string())) })
    }

    fn copy_text<'a>(&'a self, _text: &'a str) -> ShareFuture<'a, Result<(), ShareFailure>> {
        Box::pin(async { Err(ShareFailure::Other("clipboard capability unavailable".to_string())) })
    }
}

#[derive(Clone, Default)]
/// Scriptable in-memory share capability for tests.
///
/// Scripted results are consumed in order; when the queue is empty the call
/// succeeds. Every call is recorded.
pub struct MemoryShareCapability {
    inner: Rc<RefCell<MemoryShareInner>>,
}

#[derive(Default)]
struct MemoryShareInner {
    native_share: bool,
    clipboard: bool,
    mobile: bool,
    share_results: VecDeque<Result<(), ShareFailure>>,
    copy_results: VecDeque<Result<(), ShareFailure>>,
    shared: Vec<ShareRequest>,
    copied: Vec<String>,
}

impl MemoryShareCapability {
    /// Enables or disables the native share capability.
    pub fn with_native_share(self, available: bool) -> Self {
        self.inner.borrow_mut().native_share = available;
        self
    }

    /// Enables or disables the clipboard capability.
    pub fn with_clipboard(self, available: bool) -> Self {
        self.inner.borrow_mut().clipboard = available;
        self
    }

    /// Marks the environment as mobile (prefers the native share sheet).
    pub fn with_mobile(self, mobile: bool) -> Self {
        self.inner.borrow_mut().mobile = mobile;
        self
    }

    /// Queues the result of the next native share invocation.
    pub fn push_share_result(&self, result: Result<(), ShareFailure>) {
        self.inner.borrow_mut().share_results.push_back(result);
    }

    /// Queues the result of the next clipboard invocation.
    pub fn push_copy_result(&self, result: Result<(), ShareFailure>) {
        self.inner.borrow_mut().copy_results.push_back(result);
    }

    /// Requests offered to the native share sheet so far.
    pub fn shared_requests(&self) -> Vec<ShareRequest> {
        self.inner.borrow().shared.clone()
    }

    /// Texts written to the clipboard so far.
    pub fn copied_texts(&self) -> Vec<String> {
        self.inner.borrow().copied.clone()
    }
}

impl ShareCapability for MemoryShareCapability {
    fn supports_native_share(&self) -> bool {
        self.inner.borrow().native_share
    }

    fn supports_clipboard(&self) -> bool {
        self.inner.borrow().clipboard
    }

    fn prefers_native_share(&self) -> bool {
        self.inner.borrow().mobile
    }

    fn native_share<'a>(
        &'a self,
        request: &'a ShareRequest,
    ) -> ShareFuture<'a, Result<(), ShareFailure>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.shared.push(request.clone());
            inner.share_results.pop_front().unwrap_or(Ok(()))
        })
    }

    fn copy_text<'a>(&'a self, text: &'a str) -> ShareFuture<'a, Result<(), ShareFailure>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.copied.push(text.to_string());
            inner.copy_results.pop_front().unwrap_or(Ok(()))
        })
    }
}
