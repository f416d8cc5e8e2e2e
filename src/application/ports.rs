//! Capabilities consumed by the page controllers
//!
//! The controllers never talk to the network, the browser or the toast layer
//! directly. Each side effect goes through one of these traits so tests can
//! substitute recording doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::checkout::CheckoutIdentifiers;
use crate::domain::routes::Route;
use crate::domain::session::PaymentSession;
use crate::shared::error::AppResult;

/// Upstream hosted-page API
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Fetch the current session for an application and payment key
    async fn fetch_session(&self, app_id: i64, payment_key: &str) -> AppResult<PaymentSession>;

    /// Ask the API to re-check the payment and return the refreshed session.
    /// Safe to call repeatedly.
    async fn refresh_status(&self, app_id: i64, payment_key: &str) -> AppResult<PaymentSession>;
}

/// Navigation primitives of the hosting page
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, query: Option<CheckoutIdentifiers>, replace: bool);

    fn go_back(&self);

    /// Leave the application for an external URL
    fn redirect_browser(&self, url: &str);
}

/// Kind of a one-shot user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

impl MessageKind {
    /// How long the message stays visible, in milliseconds
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            MessageKind::Success => 2000,
            MessageKind::Error => 3000,
            MessageKind::Info => 2000,
        }
    }
}

/// User-visible notification channel
pub trait Notifier: Send + Sync {
    fn present(&self, kind: MessageKind, text: &str);
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
