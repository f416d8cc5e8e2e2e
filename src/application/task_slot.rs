//! Single-owner handle for a background task

use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Holds at most one spawned task. Replacing or cancelling aborts the task
/// currently held, and so does dropping the slot.
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle`, aborting whatever task was held before
    pub fn replace(&self, handle: JoinHandle<()>) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Abort the held task, if any
    pub fn cancel(&self) {
        let current = self.handle.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(current) = current {
            current.abort();
        }
    }

    /// Whether a task is held and has not finished yet
    pub fn is_active(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
