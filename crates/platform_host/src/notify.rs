//! User-visible notice contracts and adapters.
//!
//! The deployed notice path is a blocking browser dialog, so delivery is
//! synchronous and infallible from the caller's point of view.

use std::{cell::RefCell, rc::Rc};

/// Host service delivering a user-visible notice.
pub trait UserNotifier {
    /// Delivers `message` to the user.
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Notifier that drops every message, for unsupported targets.
pub struct NoopUserNotifier;

impl UserNotifier for NoopUserNotifier {
    fn notify(&self, _message: &str) {}
}

#[derive(Debug, Clone, Default)]
/// Recording notifier for tests.
pub struct MemoryUserNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl MemoryUserNotifier {
    /// Messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl UserNotifier for MemoryUserNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
