//! Cancellable delayed-task contracts and the manual test scheduler.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Host service scheduling one-shot delayed tasks.
pub trait DelayScheduler {
    /// Schedules `task` to run once after `delay_ms`. Dropping or cancelling
    /// the returned handle prevents the task from running.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> DelayHandle;
}

/// Handle to a scheduled delayed task. Cancels the task on drop.
pub struct DelayHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl DelayHandle {
    /// Builds a handle around a cancellation closure.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the scheduled task. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for DelayHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Clone, Default)]
/// Deterministic scheduler for tests: tasks run only when explicitly fired.
pub struct ManualDelayScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    pending: BTreeMap<u64, PendingTask>,
}

struct PendingTask {
    delay_ms: u32,
    task: Box<dyn FnOnce()>,
}

impl ManualDelayScheduler {
    /// Returns the number of tasks scheduled and not yet fired or cancelled.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Returns the delay of the oldest pending task, if any.
    pub fn next_delay_ms(&self) -> Option<u32> {
        self.inner
            .borrow()
            .pending
            .values()
            .next()
            .map(|p| p.delay_ms)
    }

    /// Runs the oldest pending task. Returns `false` when nothing is pending.
    pub fn fire_next(&self) -> bool {
        let task = {
            let mut inner = self.inner.borrow_mut();
            let Some((&id, _)) = inner.pending.iter().next() else {
                return false;
            };
            inner.pending.remove(&id)
        };
        if let Some(pending) = task {
            (pending.task)();
            true
        } else {
            false
        }
    }

    /// Runs every pending task in scheduling order.
    pub fn fire_all(&self) {
        while self.fire_next() {}
    }
}

impl DelayScheduler for ManualDelayScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> DelayHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.pending.insert(id, PendingTask { delay_ms, task });
            id
        };
        let inner = self.inner.clone();
        DelayHandle::new(move || {
            inner.borrow_mut().pending.remove(&id);
        })
    }
}
