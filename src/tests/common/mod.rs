//! Common test utilities
//!
//! A scripted [`SessionGateway`], a clock that follows paused tokio time, and
//! payment-session fixtures.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{Clock, SessionGateway};
use crate::domain::checkout::QueryParams;
use crate::domain::session::{CryptoAmount, CryptoNetwork, PaymentSession, SessionTime};
use crate::shared::error::{AppError, AppResult};

struct Scripted {
    delay: Option<Duration>,
    result: AppResult<PaymentSession>,
}

/// Session gateway answering from scripted queues.
///
/// Each call pops the next scripted answer, sleeps its delay, then returns
/// it. An empty queue answers with a gateway error.
#[derive(Default)]
pub struct MockSessionGateway {
    fetches: Mutex<VecDeque<Scripted>>,
    refreshes: Mutex<VecDeque<Scripted>>,
    fetch_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl MockSessionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, result: AppResult<PaymentSession>) {
        push(&self.fetches, None, result);
    }

    pub fn push_fetch_after(&self, delay: Duration, result: AppResult<PaymentSession>) {
        push(&self.fetches, Some(delay), result);
    }

    pub fn push_refresh(&self, result: AppResult<PaymentSession>) {
        push(&self.refreshes, None, result);
    }

    pub fn push_refresh_after(&self, delay: Duration, result: AppResult<PaymentSession>) {
        push(&self.refreshes, Some(delay), result);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

fn push(queue: &Mutex<VecDeque<Scripted>>, delay: Option<Duration>, result: AppResult<PaymentSession>) {
    queue.lock().unwrap().push_back(Scripted { delay, result });
}

async fn answer(queue: &Mutex<VecDeque<Scripted>>, what: &str) -> AppResult<PaymentSession> {
    let scripted = queue.lock().unwrap().pop_front();
    let Some(scripted) = scripted else {
        return Err(AppError::Gateway(format!("no scripted {} response", what)));
    };
    if let Some(delay) = scripted.delay {
        tokio::time::sleep(delay).await;
    }
    scripted.result
}

#[async_trait]
impl SessionGateway for MockSessionGateway {
    async fn fetch_session(&self, _app_id: i64, _payment_key: &str) -> AppResult<PaymentSession> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.fetches, "fetch").await
    }

    async fn refresh_status(&self, _app_id: i64, _payment_key: &str) -> AppResult<PaymentSession> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.refreshes, "refresh").await
    }
}

/// Clock pinned to 2024-01-01T00:00:00Z at construction that then advances
/// with tokio time, so paused tests control both.
pub struct PausedClock {
    origin: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl PausedClock {
    pub fn new() -> Self {
        Self::starting_at(fixture_origin())
    }

    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Default for PausedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PausedClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = tokio::time::Instant::now() - self.started;
        self.origin + chrono::Duration::milliseconds(elapsed.as_millis() as i64)
    }
}

/// Instant every fixture session is created at
pub fn fixture_origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Session in `state`, created at the fixture origin with a 15 minute window
pub fn session_in_state(state: &str, return_url: Option<&str>) -> PaymentSession {
    PaymentSession {
        payment_state: Some(state.to_string()),
        created_time: Some(SessionTime::Raw("2024-01-01T00:00:00".to_string())),
        expire_at: Some(SessionTime::Raw("2024-01-01T00:15:00".to_string())),
        receiver_wallet_address: Some("X".to_string()),
        crypto_amount: CryptoAmount {
            amount: Some(json!(1)),
            crypto_network: Some(CryptoNetwork {
                blockchain: Some("ETHEREUM".to_string()),
                token: Some("USDT".to_string()),
                extra: Default::default(),
            }),
        },
        return_url: return_url.map(str::to_string),
    }
}

/// Pending session awaiting payment
pub fn pending_session(return_url: Option<&str>) -> PaymentSession {
    session_in_state("Created", return_url)
}

/// Pending session that expires `seconds` after the fixture origin
pub fn pending_session_expiring_in(seconds: i64, return_url: Option<&str>) -> PaymentSession {
    let expires = fixture_origin() + chrono::Duration::seconds(seconds);
    PaymentSession {
        expire_at: Some(SessionTime::Raw(expires.format("%Y-%m-%dT%H:%M:%S").to_string())),
        ..pending_session(return_url)
    }
}

/// Route query from literal pairs
pub fn query(pairs: &[(&str, &str)]) -> QueryParams {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Query naming app 7, payment key "abc"
pub fn checkout_query() -> QueryParams {
    query(&[("appId", "7"), ("paymentKey", "abc")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_paused_clock_follows_tokio_time() {
        let clock = PausedClock::new();
        assert_eq!(clock.now(), fixture_origin());
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(clock.now(), fixture_origin() + chrono::Duration::seconds(90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_gateway_scripts_in_order() {
        let gateway = MockSessionGateway::new();
        gateway.push_fetch(Ok(pending_session(None)));
        gateway.push_fetch(Err(AppError::Gateway("down".into())));

        assert!(gateway.fetch_session(7, "abc").await.is_ok());
        assert!(gateway.fetch_session(7, "abc").await.is_err());
        assert!(gateway.fetch_session(7, "abc").await.is_err());
        assert_eq!(gateway.fetch_calls(), 3);
        assert_eq!(gateway.refresh_calls(), 0);
    }

    #[test]
    fn test_expiring_fixture() {
        let session = pending_session_expiring_in(30, None);
        assert_eq!(session.expire_at, Some(SessionTime::Raw("2024-01-01T00:00:30".into())));
    }
}
