//! Share dispatch: capability-ordered fallback with outcome classification.
//!
//! The dispatcher tries the native share sheet or the clipboard according to
//! the selected [`SharePolicy`], classifies failures, and reports through
//! the caller's callbacks, or the injected notifier when no callback is
//! supplied. User cancellation is never reported as an error.

use std::rc::Rc;

use platform_host::{ShareCapability, ShareFailure, ShareRequest, UserNotifier};

/// Message reported after a native share completes.
pub const SHARED_MESSAGE: &str = "Thanks for sharing!";
/// Message reported after a clipboard copy completes.
pub const COPIED_MESSAGE: &str = "Link copied to clipboard";
/// Message reported when the platform denies clipboard or share permission.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission denied. Please allow clipboard access in your browser settings.";
/// Fallback message for failures that carry no message of their own.
pub const GENERIC_SHARE_ERROR: &str = "Unable to share. Please try again.";

const NO_CLIPBOARD_MESSAGE: &str = "Clipboard API not supported in this browser";
const NO_CAPABILITY_MESSAGE: &str =
    "Neither Share API nor Clipboard API are supported in this browser";

/// Strategy selecting which capability the dispatcher tries first.
///
/// Both orderings have shipped at different times; the policy is an explicit
/// decision point rather than a hardcoded order. The default is
/// [`SharePolicy::ClipboardOnDesktop`], matching the deployed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharePolicy {
    /// Use the native share sheet whenever the platform exposes one, falling
    /// back to the clipboard.
    PreferNativeShare,
    /// Copy to the clipboard on desktop; use the native sheet only where the
    /// capability reports a mobile context.
    #[default]
    ClipboardOnDesktop,
}

/// Classified outcome of one share dispatch. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share or copy completed; carries the user-facing message.
    Success(String),
    /// The user dismissed the share sheet. Suppressed from error reporting.
    UserCancelled,
    /// The platform denied permission; carries the fixed user-facing message.
    PermissionDenied(String),
    /// Neither capability exists in this environment.
    UnsupportedEnvironment(String),
    /// Any other failure, with a non-empty message.
    OtherError(String),
}

/// Callback receiving the user-facing message for one outcome.
pub type ShareCallback = Box<dyn FnOnce(&str)>;

/// Share dispatcher over an injected capability and notifier.
pub struct ShareDispatcher {
    capability: Rc<dyn ShareCapability>,
    notifier: Rc<dyn UserNotifier>,
    policy: SharePolicy,
}

impl ShareDispatcher {
    /// Builds a dispatcher with the default policy.
    pub fn new(capability: Rc<dyn ShareCapability>, notifier: Rc<dyn UserNotifier>) -> Self {
        Self {
            capability,
            notifier,
            policy: SharePolicy::default(),
        }
    }

    /// Overrides the capability-ordering policy.
    pub fn with_policy(mut self, policy: SharePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Performs one share attempt and returns the classified outcome.
    pub async fn dispatch(&self, request: &ShareRequest) -> ShareOutcome {
        let use_native = self.capability.supports_native_share()
            && match self.policy {
                SharePolicy::PreferNativeShare => true,
                SharePolicy::ClipboardOnDesktop => self.capability.prefers_native_share(),
            };

        if use_native {
            match self.capability.native_share(request).await {
                Ok(()) => ShareOutcome::Success(SHARED_MESSAGE.to_string()),
                Err(failure) => classify(failure),
            }
        } else if self.capability.supports_clipboard() {
            match self.capability.copy_text(&request.url).await {
                Ok(()) => ShareOutcome::Success(COPIED_MESSAGE.to_string()),
                Err(failure) => classify(failure),
            }
        } else {
            let message = if self.capability.prefers_native_share() {
                NO_CAPABILITY_MESSAGE
            } else {
                NO_CLIPBOARD_MESSAGE
            };
            ShareOutcome::UnsupportedEnvironment(message.to_string())
        }
    }

    /// Performs one share attempt and delivers the outcome.
    ///
    /// Success goes to `on_success`, failures to `on_error`; when a callback
    /// is absent the injected notifier delivers a blocking notice instead.
    /// Cancellation is delivered to neither; it only leaves a diagnostic
    /// log entry.
    pub async fn share(
        &self,
        request: &ShareRequest,
        on_success: Option<ShareCallback>,
        on_error: Option<ShareCallback>,
    ) {
        match self.dispatch(request).await {
            ShareOutcome::Success(message) => match on_success {
                Some(callback) => callback(&message),
                None => self.notifier.notify(&message),
            },
            ShareOutcome::UserCancelled => {}
            ShareOutcome::PermissionDenied(message) => match on_error {
                Some(callback) => callback(&message),
                None => self.notifier.notify(&message),
            },
            ShareOutcome::UnsupportedEnvironment(message)
            | ShareOutcome::OtherError(message) => {
                log::warn!("share failed: {message}");
                match on_error {
                    Some(callback) => callback(&message),
                    None => self.notifier.notify(&format!("Share failed: {message}")),
                }
            }
        }
    }
}

fn classify(failure: ShareFailure) -> ShareOutcome {
    match failure {
        ShareFailure::Cancelled => {
            log::debug!("share cancelled by user");
            ShareOutcome::UserCancelled
        }
        ShareFailure::PermissionDenied => {
            ShareOutcome::PermissionDenied(PERMISSION_DENIED_MESSAGE.to_string())
        }
        ShareFailure::Other(message) => ShareOutcome::OtherError(if message.is_empty() {
            GENERIC_SHARE_ERROR.to_string()
        } else {
            message
        }),
    }
}
