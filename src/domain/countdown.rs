//! Countdown and urgency engine
//!
//! Pure, clock-free part of the payment countdown. The caller supplies `now`
//! on every tick; the async driver lives in `application::countdown_timer`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display shown before a countdown has started or after it was cleared
pub const PLACEHOLDER_DISPLAY: &str = "--:--";

/// Display shown once the countdown has run out
pub const EXPIRED_DISPLAY: &str = "00:00";

/// Urgency of the remaining time relative to the whole payment window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Neutral,
    Ok,
    Warning,
    Danger,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::Neutral => write!(f, "neutral"),
            UrgencyLevel::Ok => write!(f, "ok"),
            UrgencyLevel::Warning => write!(f, "warning"),
            UrgencyLevel::Danger => write!(f, "danger"),
        }
    }
}

/// Format whole remaining seconds as `MM:SS`, clamped to `00:00`
pub fn format_remaining(remaining_secs: i64) -> String {
    if remaining_secs <= 0 {
        return EXPIRED_DISPLAY.to_string();
    }
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Urgency for `remaining` out of `total` seconds; `None` when there is no
/// positive window to compare against. Thresholds are inclusive.
pub fn classify_urgency(remaining_secs: i64, total_secs: i64) -> Option<UrgencyLevel> {
    if total_secs <= 0 {
        return None;
    }

    // remaining <= 0.2 * total and remaining <= 0.5 * total, in integers
    let level = if remaining_secs.saturating_mul(5) <= total_secs {
        UrgencyLevel::Danger
    } else if remaining_secs.saturating_mul(2) <= total_secs {
        UrgencyLevel::Warning
    } else {
        UrgencyLevel::Ok
    };
    Some(level)
}

/// Whole seconds from `from` to `to`, floored
pub fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(1000)
}

/// What the countdown currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub text: String,
    pub urgency: UrgencyLevel,
    pub expired: bool,
}

impl CountdownDisplay {
    pub fn neutral() -> Self {
        Self {
            text: PLACEHOLDER_DISPLAY.to_string(),
            urgency: UrgencyLevel::Neutral,
            expired: false,
        }
    }

    pub fn expired() -> Self {
        Self {
            text: EXPIRED_DISPLAY.to_string(),
            urgency: UrgencyLevel::Danger,
            expired: true,
        }
    }
}

impl Default for CountdownDisplay {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down; the display was refreshed
    Running,
    /// The countdown ran out on this tick. Returned once per run.
    Expired,
    /// Nothing to do: never started, cleared, or already expired
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Expired,
}

/// One countdown run keyed by `(created_at, expires_at)`
#[derive(Debug, Clone)]
pub struct Countdown {
    expires_at: Option<DateTime<Utc>>,
    total_secs: i64,
    state: RunState,
    display: CountdownDisplay,
}

impl Countdown {
    /// An idle countdown showing the neutral placeholder
    pub fn new() -> Self {
        Self {
            expires_at: None,
            total_secs: 0,
            state: RunState::Idle,
            display: CountdownDisplay::neutral(),
        }
    }

    /// Start a fresh run. `expires_at == None` means the expiry could not be
    /// parsed, which expires on the first tick. A missing creation time
    /// gives a zero window, so urgency stays neutral until expiry.
    pub fn start(&mut self, created_at: Option<DateTime<Utc>>, expires_at: Option<DateTime<Utc>>) {
        self.total_secs = match (created_at, expires_at) {
            (Some(created), Some(expires)) => whole_seconds_between(created, expires),
            _ => 0,
        };
        self.expires_at = expires_at;
        self.state = RunState::Running;
        self.display = CountdownDisplay::neutral();
    }

    /// Stop without expiring and restore the placeholder
    pub fn clear(&mut self) {
        self.expires_at = None;
        self.total_secs = 0;
        self.state = RunState::Idle;
        self.display = CountdownDisplay::neutral();
    }

    /// Advance the countdown to `now`
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state != RunState::Running {
            return TickOutcome::Stopped;
        }

        let Some(expires_at) = self.expires_at else {
            return self.expire();
        };

        let remaining = whole_seconds_between(now, expires_at);
        if remaining <= 0 {
            return self.expire();
        }

        self.display.text = format_remaining(remaining);
        if let Some(level) = classify_urgency(remaining, self.total_secs) {
            self.display.urgency = level;
        }
        TickOutcome::Running
    }

    fn expire(&mut self) -> TickOutcome {
        self.state = RunState::Expired;
        self.display = CountdownDisplay::expired();
        TickOutcome::Expired
    }

    pub fn display(&self) -> &CountdownDisplay {
        &self.display
    }

    pub fn total_secs(&self) -> i64 {
        self.total_secs
    }

    pub fn has_expired(&self) -> bool {
        self.state == RunState::Expired
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
