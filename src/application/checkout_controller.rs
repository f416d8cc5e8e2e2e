//! Payment-session lifecycle controller
//!
//! One controller drives one checkout page view: it resolves the session from
//! the route query, decides between the create view and the result view,
//! runs the payment countdown, and handles the confirm, cancel and expiry
//! actions. No operation returns an error; every failure ends in a
//! navigation, a user message or a cleared flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::application::countdown_timer::{CountdownTimer, ExpiryCallback};
use crate::application::ports::{Clock, MessageKind, Navigator, Notifier, SessionGateway};
use crate::application::task_slot::TaskSlot;
use crate::config::app_config::CheckoutConfig;
use crate::domain::checkout::{CheckoutIdentifiers, CheckoutState, DisplayMode, QueryParams};
use crate::domain::countdown::{CountdownDisplay, UrgencyLevel};
use crate::domain::qr::payment_uri;
use crate::domain::routes::Route;
use crate::domain::session::{PaymentClassification, PaymentSession};
use crate::shared::error::AppError;

pub const REFRESH_UNAVAILABLE_MESSAGE: &str = "An error occurred. Cannot refresh status.";
pub const TIMER_EXPIRED_MESSAGE: &str = "Payment time has expired. You will be redirected.";

/// Delays used by the controller's timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTimings {
    pub confirm_redirect_delay: Duration,
    pub expiry_redirect_delay: Duration,
    pub tick_interval: Duration,
}

impl Default for CheckoutTimings {
    fn default() -> Self {
        Self {
            confirm_redirect_delay: Duration::from_millis(1500),
            expiry_redirect_delay: Duration::from_millis(5000),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl From<&CheckoutConfig> for CheckoutTimings {
    fn from(config: &CheckoutConfig) -> Self {
        Self {
            confirm_redirect_delay: config.confirm_redirect_delay(),
            expiry_redirect_delay: config.expiry_redirect_delay(),
            tick_interval: config.tick_interval(),
        }
    }
}

/// Collaborators injected into a controller
#[derive(Clone)]
pub struct CheckoutDeps {
    pub gateway: Arc<dyn SessionGateway>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// Controller-owned page state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub state: CheckoutState,
    pub display_mode: DisplayMode,
    pub title: Option<&'static str>,
    pub is_confirming: bool,
    pub is_timer_expired: bool,
}

impl Default for CheckoutView {
    fn default() -> Self {
        Self {
            state: CheckoutState::Loading,
            display_mode: DisplayMode::Create,
            title: None,
            is_confirming: false,
            is_timer_expired: false,
        }
    }
}

struct ControllerInner {
    gateway: Arc<dyn SessionGateway>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    timings: CheckoutTimings,
    view: watch::Sender<CheckoutView>,
    route_query: Mutex<QueryParams>,
    load_error: Mutex<Option<AppError>>,
    countdown: CountdownTimer,
    confirm_task: TaskSlot,
    confirm_generation: AtomicU64,
    expiry_redirect: TaskSlot,
    torn_down: AtomicBool,
}

impl ControllerInner {
    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn update(&self, change: impl FnOnce(&mut CheckoutView)) {
        self.view.send_modify(change);
    }

    fn loaded_return_url(&self) -> Option<String> {
        self.view
            .borrow()
            .state
            .session()
            .and_then(PaymentSession::return_url)
            .map(str::to_owned)
    }

    fn is_current_confirm(&self, generation: u64) -> bool {
        !self.is_torn_down() && self.confirm_generation.load(Ordering::SeqCst) == generation
    }

    /// Translate a fatal load failure into the not-found page
    fn fail(&self, err: AppError) {
        error!(error = %err, "Critical error in checkout stream");
        let message = err.to_string();
        *self.load_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
        self.update(|view| view.state = CheckoutState::Error { error: message });
        self.navigator.navigate(Route::NotFound, None, false);
    }

    fn on_timer_expired(inner: &Arc<Self>) {
        if inner.is_torn_down() {
            return;
        }

        inner.update(|view| view.is_timer_expired = true);
        inner.notifier.present(MessageKind::Error, TIMER_EXPIRED_MESSAGE);

        let Some(url) = inner.loaded_return_url() else {
            error!("Timer expired but no return URL was found in the session");
            return;
        };

        let weak = Arc::downgrade(inner);
        let delay = inner.timings.expiry_redirect_delay;
        inner.expiry_redirect.replace(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade().filter(|inner| !inner.is_torn_down()) {
                info!(url = %url, "Redirecting after payment time expired");
                inner.navigator.redirect_browser(&url);
            }
        }));
    }

    fn expiry_callback(inner: &Arc<Self>) -> ExpiryCallback {
        let weak: Weak<Self> = Arc::downgrade(inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                ControllerInner::on_timer_expired(&inner);
            }
        })
    }
}

/// Checkout page controller. Cheap to clone; clones share one page.
#[derive(Clone)]
pub struct CheckoutController {
    inner: Arc<ControllerInner>,
}

impl CheckoutController {
    pub fn new(deps: CheckoutDeps, timings: CheckoutTimings) -> Self {
        let (view, _) = watch::channel(CheckoutView::default());
        Self {
            inner: Arc::new(ControllerInner {
                gateway: deps.gateway,
                navigator: deps.navigator,
                notifier: deps.notifier,
                timings,
                view,
                route_query: Mutex::new(QueryParams::new()),
                load_error: Mutex::new(None),
                countdown: CountdownTimer::new(deps.clock, timings.tick_interval),
                confirm_task: TaskSlot::new(),
                confirm_generation: AtomicU64::new(0),
                expiry_redirect: TaskSlot::new(),
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    /// Resolve the session named by `query` and settle the page.
    ///
    /// Completes once the initial fetch has been handled. A result arriving
    /// after `teardown` is ignored.
    pub async fn initialize(&self, query: QueryParams) {
        let inner = &self.inner;
        *inner.route_query.lock().unwrap_or_else(PoisonError::into_inner) = query.clone();

        let ids = match CheckoutIdentifiers::from_query(&query) {
            Ok(ids) => ids,
            Err(err) => {
                inner.fail(err);
                return;
            }
        };

        inner.update(|view| view.state = CheckoutState::Loading);
        let result = inner.gateway.fetch_session(ids.app_id, &ids.payment_key).await;

        if inner.is_torn_down() {
            debug!(app_id = ids.app_id, "Discarding session fetched after teardown");
            return;
        }

        match result {
            Ok(session) if !session.is_pending() => {
                info!(
                    app_id = ids.app_id,
                    payment_state = ?session.payment_state,
                    "Session no longer pending, showing result page"
                );
                inner.update(|view| {
                    view.display_mode = DisplayMode::Result;
                    view.title = Some(DisplayMode::Result.title());
                });
                inner.navigator.navigate(Route::Result, Some(ids), true);
            }
            Ok(mut session) => {
                session.normalize_timestamps();
                let created_at = session.created_at();
                let expires_at = session.expires_at();
                let has_expiry = session.has_expiry();

                inner.update(|view| {
                    view.display_mode = DisplayMode::Create;
                    view.title = Some(DisplayMode::Create.title());
                    view.state = CheckoutState::Loaded { session };
                });

                if has_expiry {
                    let on_expired = ControllerInner::expiry_callback(inner);
                    inner.countdown.start(created_at, expires_at, on_expired);
                } else {
                    inner.countdown.clear();
                }
            }
            Err(err) => inner.fail(err),
        }
    }

    /// Replace the route query snapshot read by `confirm`
    pub fn set_route_query(&self, query: QueryParams) {
        *self.inner.route_query.lock().unwrap_or_else(PoisonError::into_inner) = query;
    }

    /// Re-check the payment status. Only acts on a loaded page.
    pub fn confirm(&self) {
        let inner = &self.inner;
        if inner.is_torn_down() || !inner.view.borrow().state.is_loaded() {
            debug!("Confirm ignored, no session loaded");
            return;
        }

        let query = inner.route_query.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let ids = match CheckoutIdentifiers::from_query(&query) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "Cannot refresh status without route identifiers");
                inner.notifier.present(MessageKind::Error, REFRESH_UNAVAILABLE_MESSAGE);
                return;
            }
        };

        inner.update(|view| view.is_confirming = true);
        let generation = inner.confirm_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let weak = Arc::downgrade(inner);
        let gateway = Arc::clone(&inner.gateway);
        let delay = inner.timings.confirm_redirect_delay;
        inner.confirm_task.replace(tokio::spawn(async move {
            let result = gateway.refresh_status(ids.app_id, &ids.payment_key).await;

            let Some(inner) = weak.upgrade().filter(|inner| inner.is_current_confirm(generation)) else {
                return;
            };

            match result {
                Ok(session) => match session.return_url().map(str::to_owned) {
                    Some(url) => {
                        drop(inner);
                        tokio::time::sleep(delay).await;
                        if let Some(inner) = weak.upgrade().filter(|inner| inner.is_current_confirm(generation)) {
                            info!(url = %url, "Payment confirmed, redirecting to return URL");
                            inner.navigator.redirect_browser(&url);
                        }
                    }
                    None => inner.update(|view| view.is_confirming = false),
                },
                Err(err) => {
                    error!(error = %err, app_id = ids.app_id, "Failed to refresh status");
                    inner.update(|view| view.is_confirming = false);
                }
            }
        }));
    }

    /// Leave for the merchant's return URL, or go back when there is none
    pub fn cancel(&self) {
        match self.inner.loaded_return_url() {
            Some(url) => self.inner.navigator.redirect_browser(&url),
            None => {
                warn!("Return to store requested without a return URL, going back");
                self.inner.navigator.go_back();
            }
        }
    }

    /// Release every timer and in-flight call of this page
    pub fn teardown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.countdown.stop();
        self.inner.confirm_task.cancel();
        self.inner.expiry_redirect.cancel();
    }

    pub fn view(&self) -> CheckoutView {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutView> {
        self.inner.view.subscribe()
    }

    /// The failure that ended loading, if any
    pub fn load_error(&self) -> Option<AppError> {
        self.inner.load_error.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn current_session(&self) -> Option<PaymentSession> {
        self.inner.view.borrow().state.session().cloned()
    }

    /// Classification of the loaded session; `InProgress` when none is loaded
    pub fn classification(&self) -> PaymentClassification {
        let view = self.inner.view.borrow();
        PaymentClassification::from_state(view.state.session().and_then(|s| s.payment_state.as_deref()))
    }

    pub fn status_title(&self) -> &'static str {
        self.classification().title()
    }

    pub fn status_message(&self) -> &'static str {
        self.classification().message()
    }

    /// Wallet payment URI of the loaded session, empty before loading
    pub fn qr_payload(&self) -> String {
        self.inner.view.borrow().state.session().map(payment_uri).unwrap_or_default()
    }

    pub fn countdown(&self) -> CountdownDisplay {
        self.inner.countdown.snapshot()
    }

    /// Countdown urgency, forced to danger with no session or after expiry
    pub fn urgency(&self) -> UrgencyLevel {
        let view = self.inner.view.borrow();
        if !view.state.is_loaded() || view.is_timer_expired {
            return UrgencyLevel::Danger;
        }
        self.inner.countdown.snapshot().urgency
    }

    pub fn is_confirming(&self) -> bool {
        self.inner.view.borrow().is_confirming
    }

    pub fn is_timer_expired(&self) -> bool {
        self.inner.view.borrow().is_timer_expired
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.is_torn_down()
    }
}
