//! Auto-clearing timer for transient user notices.

use std::{cell::RefCell, rc::Rc};

use platform_host::{DelayHandle, DelayScheduler};

/// Default display duration for transient notices.
pub const NOTICE_DURATION_MS: u32 = 4_000;

/// Arms a one-shot clear timer each time a notice is shown.
///
/// Re-arming cancels the previous timer, so a notice shown while another is
/// on screen gets the full duration. Dropping the tracker cancels any
/// pending clear.
pub struct TransientNotice {
    scheduler: Rc<dyn DelayScheduler>,
    pending: RefCell<Option<DelayHandle>>,
}

impl TransientNotice {
    /// Builds a tracker on the host scheduler.
    pub fn new(scheduler: Rc<dyn DelayScheduler>) -> Self {
        Self {
            scheduler,
            pending: RefCell::new(None),
        }
    }

    /// Schedules `on_clear` to run after `duration_ms`, cancelling any
    /// previously armed timer first.
    pub fn arm(&self, duration_ms: u32, on_clear: impl FnOnce() + 'static) {
        let handle = self.scheduler.schedule(duration_ms, Box::new(on_clear));
        // Replacing the slot drops and thereby cancels the old timer.
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Cancels the pending clear, if any. Idempotent.
    pub fn cancel(&self) {
        if let Some(mut handle) = self.pending.borrow_mut().take() {
            handle.cancel();
        }
    }

    /// Whether a clear timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.pending.borrow().is_some()
    }
}
