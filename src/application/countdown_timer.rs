//! Async driver for the payment countdown
//!
//! Wraps the pure [`Countdown`] in a restartable periodic task. The first
//! tick is computed synchronously on `start`, so the display is correct
//! before the first interval elapses.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::application::ports::Clock;
use crate::application::task_slot::TaskSlot;
use crate::domain::countdown::{Countdown, CountdownDisplay, TickOutcome};

/// Invoked once when a run expires
pub type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

struct TimerShared {
    countdown: Mutex<Countdown>,
    display: watch::Sender<CountdownDisplay>,
}

impl TimerShared {
    fn tick(&self, now: DateTime<Utc>) -> TickOutcome {
        let mut countdown = self.countdown.lock().unwrap_or_else(PoisonError::into_inner);
        let outcome = countdown.tick(now);
        if outcome != TickOutcome::Stopped {
            self.display.send_replace(countdown.display().clone());
        }
        outcome
    }

    fn with_countdown(&self, update: impl FnOnce(&mut Countdown)) {
        let mut countdown = self.countdown.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut countdown);
        self.display.send_replace(countdown.display().clone());
    }
}

/// Restartable countdown keyed by `(created_at, expires_at)`
pub struct CountdownTimer {
    shared: Arc<TimerShared>,
    ticker: TaskSlot,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl CountdownTimer {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (display, _) = watch::channel(CountdownDisplay::neutral());
        Self {
            shared: Arc::new(TimerShared {
                countdown: Mutex::new(Countdown::new()),
                display,
            }),
            ticker: TaskSlot::new(),
            clock,
            interval,
        }
    }

    /// Start a fresh run, cancelling any run in progress.
    ///
    /// `expires_at == None` is an expiry that could not be parsed and fires
    /// `on_expired` straight away, as does an expiry already in the past.
    pub fn start(
        &self,
        created_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        on_expired: ExpiryCallback,
    ) {
        self.ticker.cancel();
        if expires_at.is_none() {
            warn!("Invalid expiry received, countdown expires immediately");
        }

        self.shared.with_countdown(|countdown| countdown.start(created_at, expires_at));
        if self.shared.tick(self.clock.now()) == TickOutcome::Expired {
            on_expired();
            return;
        }

        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        let period = self.interval;
        self.ticker.replace(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately and was already applied
            interval.tick().await;

            let outcome = loop {
                interval.tick().await;
                match shared.tick(clock.now()) {
                    TickOutcome::Running => {}
                    other => break other,
                }
            };

            if outcome == TickOutcome::Expired {
                debug!("Countdown expired");
                on_expired();
            }
        }));
    }

    /// Stop without expiring and show the placeholder again
    pub fn clear(&self) {
        self.ticker.cancel();
        self.shared.with_countdown(Countdown::clear);
    }

    /// Stop ticking but keep the last display
    pub fn stop(&self) {
        self.ticker.cancel();
    }

    pub fn snapshot(&self) -> CountdownDisplay {
        self.shared.display.borrow().clone()
    }

    pub fn has_expired(&self) -> bool {
        self.shared
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .has_expired()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }
}
