//! Unit tests for the checkout page controller
//!
//! Every test runs on paused tokio time with [`PausedClock`], so timer
//! behaviour is checked at exact offsets.

use std::sync::Arc;
use std::time::Duration;

use crate::application::checkout_controller::{
    CheckoutController, CheckoutDeps, CheckoutTimings, REFRESH_UNAVAILABLE_MESSAGE, TIMER_EXPIRED_MESSAGE,
};
use crate::application::ports::MessageKind;
use crate::domain::checkout::{CheckoutIdentifiers, CheckoutState, DisplayMode};
use crate::domain::countdown::UrgencyLevel;
use crate::domain::routes::{Navigation, Route};
use crate::domain::session::{PaymentClassification, SessionTime};
use crate::infrastructure::adapters::{QueuedNotifier, RecordingNavigator};
use crate::shared::error::AppError;
use crate::tests::common::{
    checkout_query, pending_session, pending_session_expiring_in, query, session_in_state, MockSessionGateway,
    PausedClock,
};

const RETURN_URL: &str = "https://shop.example/return";

struct Page {
    controller: CheckoutController,
    gateway: Arc<MockSessionGateway>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<QueuedNotifier>,
}

impl Page {
    fn new() -> Self {
        let gateway = Arc::new(MockSessionGateway::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(QueuedNotifier::default());
        let controller = CheckoutController::new(
            CheckoutDeps {
                gateway: gateway.clone(),
                navigator: navigator.clone(),
                notifier: notifier.clone(),
                clock: Arc::new(PausedClock::new()),
            },
            CheckoutTimings::default(),
        );
        Self {
            controller,
            gateway,
            navigator,
            notifier,
        }
    }

    /// A page that has loaded `session` from the standard query
    async fn loaded(session: crate::domain::session::PaymentSession) -> Self {
        let page = Self::new();
        page.gateway.push_fetch(Ok(session));
        page.controller.initialize(checkout_query()).await;
        page
    }

    fn messages_with(&self, text: &str) -> usize {
        self.notifier.pending().iter().filter(|m| m.text == text).count()
    }

    fn redirects(&self) -> Vec<String> {
        self.navigator
            .history()
            .into_iter()
            .filter_map(|navigation| match navigation {
                Navigation::External { url } => Some(url),
                _ => None,
            })
            .collect()
    }
}

async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
    tokio::task::yield_now().await;
}

mod loading {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pending_session_loads_create_view() {
        let page = Page::loaded(pending_session(None)).await;
        let view = page.controller.view();

        assert!(view.state.is_loaded());
        assert_eq!(view.display_mode, DisplayMode::Create);
        assert_eq!(view.title, Some("Pay with Crypto"));
        assert!(page.navigator.history().is_empty());

        let session = page.controller.current_session().unwrap();
        assert!(matches!(session.created_time, Some(SessionTime::Instant(_))));
        assert!(matches!(session.expire_at, Some(SessionTime::Instant(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_session_derived_values() {
        let page = Page::loaded(pending_session(None)).await;

        assert_eq!(page.controller.qr_payload(), "ethereum:X?amount=1");
        assert_eq!(page.controller.countdown().text, "15:00");
        assert_eq!(page.controller.urgency(), UrgencyLevel::Ok);
        assert_eq!(page.controller.classification(), PaymentClassification::InProgress);
        assert_eq!(page.controller.status_title(), "Processing");
        assert_eq!(page.controller.status_message(), "Your payment is being processed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_session_replaces_with_result_page() {
        for state in ["Paid", "Failed", "Expired", "created"] {
            let page = Page::new();
            let mut states = page.controller.subscribe();
            page.gateway.push_fetch(Ok(session_in_state(state, Some(RETURN_URL))));
            page.controller.initialize(checkout_query()).await;

            let history = page.navigator.history();
            assert_eq!(history.len(), 1, "state {}", state);
            assert_eq!(
                history[0],
                Navigation::Route {
                    route: Route::Result,
                    query: Some(CheckoutIdentifiers::new(7, "abc")),
                    replace: true,
                }
            );
            assert_eq!(history[0].location().unwrap(), "/result?appId=7&paymentKey=abc");

            let view = page.controller.view();
            assert_eq!(view.display_mode, DisplayMode::Result);
            assert_eq!(view.title, Some("Payment Result"));
            assert!(!view.state.is_loaded());
            assert!(!states.borrow_and_update().state.is_loaded());
            assert!(!page.controller.countdown().expired);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_payment_key_goes_to_not_found_without_fetch() {
        let page = Page::new();
        page.controller.initialize(query(&[("appId", "7")])).await;

        assert_eq!(page.gateway.fetch_calls(), 0);
        assert!(matches!(page.controller.load_error(), Some(AppError::MissingParameters(_))));
        assert_eq!(
            page.navigator.history(),
            vec![Navigation::to_route(Route::NotFound, None, false)]
        );
        assert!(matches!(page.controller.view().state, CheckoutState::Error { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_non_numeric_ids_are_missing() {
        for params in [
            query(&[("appId", ""), ("paymentKey", "abc")]),
            query(&[("appId", "seven"), ("paymentKey", "abc")]),
            query(&[("appId", "7"), ("paymentKey", "")]),
        ] {
            let page = Page::new();
            page.controller.initialize(params).await;
            assert_eq!(page.gateway.fetch_calls(), 0);
            assert_eq!(page.navigator.latest().unwrap().location().unwrap(), "/not-found");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_goes_to_not_found() {
        let page = Page::new();
        page.gateway.push_fetch(Err(AppError::Http {
            status: 404,
            message: "unknown session".into(),
        }));
        page.controller.initialize(checkout_query()).await;

        assert_eq!(page.gateway.fetch_calls(), 1);
        assert_eq!(page.navigator.latest().unwrap().location().unwrap(), "/not-found");
        assert!(matches!(page.controller.load_error(), Some(AppError::Http { status: 404, .. })));
        match page.controller.view().state {
            CheckoutState::Error { error } => assert!(error.contains("unknown session")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_expiry_keeps_placeholder() {
        let mut session = pending_session(None);
        session.expire_at = None;
        let page = Page::loaded(session).await;

        advance(Duration::from_secs(3600)).await;
        assert_eq!(page.controller.countdown().text, "--:--");
        assert_eq!(page.controller.countdown().urgency, UrgencyLevel::Neutral);
        assert!(!page.controller.is_timer_expired());
    }
}

mod confirm {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_confirm_redirects_once_after_delay() {
        let page = Page::loaded(pending_session(Some(RETURN_URL))).await;
        page.gateway.push_refresh(Ok(session_in_state("Paid", Some(RETURN_URL))));

        page.controller.confirm();
        assert!(page.controller.is_confirming());

        advance(Duration::from_millis(1400)).await;
        assert!(page.redirects().is_empty());
        assert!(page.controller.is_confirming());

        advance(Duration::from_millis(200)).await;
        assert_eq!(page.redirects(), vec![RETURN_URL.to_string()]);
        assert!(page.controller.is_confirming());

        advance(Duration::from_secs(10)).await;
        assert_eq!(page.redirects().len(), 1);
        assert_eq!(page.gateway.refresh_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_without_return_url_clears_flag() {
        let page = Page::loaded(pending_session(None)).await;
        page.gateway.push_refresh(Ok(pending_session(None)));

        page.controller.confirm();
        assert!(page.controller.is_confirming());
        advance(Duration::from_millis(10)).await;

        assert!(!page.controller.is_confirming());
        assert!(page.navigator.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_failure_clears_flag() {
        let page = Page::loaded(pending_session(Some(RETURN_URL))).await;
        page.gateway.push_refresh(Err(AppError::Gateway("timeout".into())));

        page.controller.confirm();
        advance(Duration::from_millis(10)).await;

        assert!(!page.controller.is_confirming());
        assert!(page.controller.view().state.is_loaded());
        advance(Duration::from_secs(5)).await;
        assert!(page.redirects().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_confirm_supersedes_first() {
        let page = Page::loaded(pending_session(None)).await;
        page.gateway
            .push_refresh_after(Duration::from_secs(1), Ok(pending_session(Some("https://first.example"))));
        page.gateway
            .push_refresh_after(Duration::from_secs(1), Ok(pending_session(Some("https://second.example"))));

        page.controller.confirm();
        advance(Duration::from_millis(100)).await;
        page.controller.confirm();

        advance(Duration::from_secs(5)).await;
        assert_eq!(page.gateway.refresh_calls(), 2);
        assert_eq!(page.redirects(), vec!["https://second.example".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_without_route_ids_shows_error() {
        let page = Page::loaded(pending_session(Some(RETURN_URL))).await;
        page.controller.set_route_query(query(&[("appId", "7")]));

        page.controller.confirm();
        advance(Duration::from_millis(10)).await;

        assert_eq!(page.gateway.refresh_calls(), 0);
        assert!(!page.controller.is_confirming());
        let messages = page.notifier.pending();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageKind::Error);
        assert_eq!(messages[0].text, REFRESH_UNAVAILABLE_MESSAGE);
        assert_eq!(messages[0].duration_ms, 3000);
    }
}

mod expiry {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expiry_notifies_and_redirects_after_delay() {
        let page = Page::loaded(pending_session_expiring_in(3, Some(RETURN_URL))).await;
        assert!(!page.controller.is_timer_expired());

        advance(Duration::from_millis(3500)).await;
        assert!(page.controller.is_timer_expired());
        assert_eq!(page.controller.countdown().text, "00:00");
        assert_eq!(page.controller.urgency(), UrgencyLevel::Danger);
        assert_eq!(page.messages_with(TIMER_EXPIRED_MESSAGE), 1);
        assert!(page.redirects().is_empty());

        advance(Duration::from_millis(4400)).await;
        assert!(page.redirects().is_empty());

        advance(Duration::from_millis(200)).await;
        assert_eq!(page.redirects(), vec![RETURN_URL.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_without_return_url_stays() {
        let page = Page::loaded(pending_session_expiring_in(2, None)).await;

        advance(Duration::from_secs(30)).await;
        assert!(page.controller.is_timer_expired());
        assert_eq!(page.messages_with(TIMER_EXPIRED_MESSAGE), 1);
        assert!(page.navigator.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_fires_once() {
        let page = Page::loaded(pending_session_expiring_in(2, Some(RETURN_URL))).await;

        advance(Duration::from_secs(120)).await;
        assert_eq!(page.messages_with(TIMER_EXPIRED_MESSAGE), 1);
        assert_eq!(page.redirects().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_expiry_expires_at_load() {
        let page = Page::loaded(pending_session_expiring_in(-60, None)).await;

        assert!(page.controller.is_timer_expired());
        assert_eq!(page.controller.countdown().text, "00:00");
        assert_eq!(page.messages_with(TIMER_EXPIRED_MESSAGE), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_expiry_expires_at_load() {
        let mut session = pending_session(None);
        session.expire_at = Some(SessionTime::Raw("garbage".into()));
        let page = Page::loaded(session).await;

        assert!(page.controller.is_timer_expired());
        assert!(page.controller.countdown().expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_urgency_escalates_with_time() {
        let page = Page::loaded(pending_session(None)).await;
        assert_eq!(page.controller.urgency(), UrgencyLevel::Ok);

        advance(Duration::from_millis(451_500)).await;
        assert_eq!(page.controller.urgency(), UrgencyLevel::Warning);

        advance(Duration::from_secs(270)).await;
        assert_eq!(page.controller.urgency(), UrgencyLevel::Danger);
        assert!(!page.controller.is_timer_expired());
    }
}

mod leaving {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_cancel_with_return_url_leaves() {
        let page = Page::loaded(pending_session(Some(RETURN_URL))).await;
        page.controller.cancel();
        assert_eq!(page.navigator.history(), vec![Navigation::External { url: RETURN_URL.into() }]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_without_return_url_goes_back() {
        let page = Page::loaded(pending_session(None)).await;
        page.controller.cancel();
        assert_eq!(page.navigator.history(), vec![Navigation::Back]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_redirects() {
        let page = Page::loaded(pending_session_expiring_in(2, Some(RETURN_URL))).await;
        page.gateway
            .push_refresh_after(Duration::from_secs(2), Ok(pending_session(Some(RETURN_URL))));

        page.controller.confirm();
        advance(Duration::from_millis(2500)).await;
        assert!(page.controller.is_timer_expired());
        assert!(page.redirects().is_empty());

        page.controller.teardown();
        let countdown = page.controller.countdown();
        advance(Duration::from_secs(30)).await;

        assert!(page.redirects().is_empty());
        assert_eq!(page.controller.countdown(), countdown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_ticking() {
        let page = Page::loaded(pending_session(Some(RETURN_URL))).await;
        advance(Duration::from_secs(10)).await;
        page.controller.teardown();
        let frozen = page.controller.countdown();

        advance(Duration::from_secs(1200)).await;
        assert_eq!(page.controller.countdown(), frozen);
        assert!(!page.controller.is_timer_expired());
        assert!(page.navigator.history().is_empty());
    }
}
