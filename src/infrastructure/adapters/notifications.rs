//! Per-page user notification queue

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

use crate::application::ports::{MessageKind, Notifier};

const DEFAULT_CAPACITY: usize = 16;

/// A notification waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
    pub duration_ms: u64,
}

/// Bounded queue; the oldest message is dropped when full
#[derive(Debug)]
pub struct QueuedNotifier {
    queue: Mutex<VecDeque<UserMessage>>,
    capacity: usize,
}

impl QueuedNotifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Take every queued message
    pub fn drain(&self) -> Vec<UserMessage> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).drain(..).collect()
    }

    /// Queued messages, left in place
    pub fn pending(&self) -> Vec<UserMessage> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).iter().cloned().collect()
    }
}

impl Default for QueuedNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier for QueuedNotifier {
    fn present(&self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Error => warn!(message = %text, "User error message"),
            MessageKind::Success | MessageKind::Info => info!(message = %text, "User message"),
        }

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(UserMessage {
            kind,
            text: text.to_string(),
            duration_ms: kind.default_duration_ms(),
        });
    }
}
