//! Checkout service managing live checkout pages
//!
//! Each opened page gets its own controller with a recording navigator and a
//! notification queue. Pages that navigate away while loading are torn down
//! at once; loaded pages are kept until closed or swept.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::application::checkout_controller::{CheckoutController, CheckoutDeps, CheckoutTimings};
use crate::application::ports::{Clock, SessionGateway};
use crate::application::result_controller::ResultController;
use crate::config::AppConfig;
use crate::domain::checkout::{CheckoutIdentifiers, CheckoutState, DisplayMode, QueryParams};
use crate::domain::countdown::{CountdownDisplay, UrgencyLevel};
use crate::domain::routes::{Navigation, Route};
use crate::domain::session::{format_display_amount, PaymentClassification, PaymentSession};
use crate::domain::tokens::{self, TokenInfo};
use crate::infrastructure::adapters::{QueuedNotifier, RecordingNavigator, UserMessage};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use crate::shared::metrics::CheckoutMetrics;

/// Everything the presentation surface needs to render a checkout page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPageView {
    pub page_id: Uuid,
    pub state: CheckoutState,
    pub display_mode: DisplayMode,
    pub title: Option<&'static str>,
    pub is_confirming: bool,
    pub is_timer_expired: bool,
    pub countdown: CountdownDisplay,
    pub urgency: UrgencyLevel,
    pub classification: PaymentClassification,
    pub status_title: &'static str,
    pub status_message: &'static str,
    pub qr_payload: String,
    pub display_amount: Option<String>,
    pub token: Option<&'static TokenInfo>,
    pub navigation: Option<Navigation>,
    pub location: Option<String>,
    pub messages: Vec<UserMessage>,
}

/// Result page contents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPageView {
    pub title: &'static str,
    pub session: Option<PaymentSession>,
    pub classification: PaymentClassification,
    pub status_title: &'static str,
    pub status_message: &'static str,
    pub display_amount: Option<String>,
}

/// Outcome of opening a checkout page
#[derive(Debug, Clone)]
pub enum PageOpening {
    /// The page navigated away while loading
    Redirect(Navigation),
    /// The page loaded and is now held under its id
    Opened(Box<CheckoutPageView>),
}

struct PageEntry {
    controller: CheckoutController,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<QueuedNotifier>,
    last_access: Instant,
}

impl PageEntry {
    fn view(&self, page_id: Uuid) -> CheckoutPageView {
        let controller = &self.controller;
        let page = controller.view();
        let session = page.state.session();
        let navigation = self.navigator.latest();

        CheckoutPageView {
            page_id,
            display_amount: session.and_then(display_amount),
            token: session.and_then(token_info),
            location: navigation.as_ref().and_then(Navigation::location),
            navigation,
            countdown: controller.countdown(),
            urgency: controller.urgency(),
            classification: controller.classification(),
            status_title: controller.status_title(),
            status_message: controller.status_message(),
            qr_payload: controller.qr_payload(),
            messages: self.notifier.drain(),
            display_mode: page.display_mode,
            title: page.title,
            is_confirming: page.is_confirming,
            is_timer_expired: page.is_timer_expired,
            state: page.state,
        }
    }
}

fn result_view(controller: &ResultController) -> ResultPageView {
    let view = controller.view();
    let classification = controller.classification();
    ResultPageView {
        title: view.title,
        display_amount: view.session.as_ref().and_then(display_amount),
        session: view.session,
        classification,
        status_title: classification.title(),
        status_message: classification.message(),
    }
}

fn display_amount(session: &PaymentSession) -> Option<String> {
    session.crypto_amount.numeric().map(format_display_amount)
}

fn token_info(session: &PaymentSession) -> Option<&'static TokenInfo> {
    let amount = &session.crypto_amount;
    tokens::lookup(amount.token()?, amount.blockchain()?)
}

/// Registry of live checkout pages
pub struct CheckoutService {
    gateway: Arc<dyn SessionGateway>,
    clock: Arc<dyn Clock>,
    metrics: Arc<CheckoutMetrics>,
    timings: CheckoutTimings,
    page_ttl: std::time::Duration,
    sweep_interval: std::time::Duration,
    pages: RwLock<HashMap<Uuid, PageEntry>>,
}

impl CheckoutService {
    pub fn new(
        config: &AppConfig,
        gateway: Arc<dyn SessionGateway>,
        clock: Arc<dyn Clock>,
        metrics: Arc<CheckoutMetrics>,
    ) -> Self {
        Self {
            gateway,
            clock,
            metrics,
            timings: CheckoutTimings::from(&config.checkout),
            page_ttl: config.checkout.page_ttl(),
            sweep_interval: config.checkout.sweep_interval(),
            pages: RwLock::new(HashMap::new()),
        }
    }

    /// Open a checkout page for the given route query
    pub async fn open(&self, query: QueryParams) -> PageOpening {
        self.metrics.record_page_opened();

        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(QueuedNotifier::default());
        let controller = CheckoutController::new(
            CheckoutDeps {
                gateway: Arc::clone(&self.gateway),
                navigator: navigator.clone(),
                notifier: notifier.clone(),
                clock: Arc::clone(&self.clock),
            },
            self.timings,
        );

        let ids = CheckoutIdentifiers::from_query(&query).ok();
        controller.initialize(query).await;

        if let Some(navigation) = navigator.latest() {
            if let Navigation::Route { route, .. } = &navigation {
                match route {
                    Route::Result => self.metrics.record_result_redirect(),
                    Route::NotFound => self.metrics.record_not_found_redirect(),
                    Route::Checkout => {}
                }
            }
            if let Some(error) = controller.load_error() {
                LoggingUtils::log_page_failed(&error);
            }
            controller.teardown();
            return PageOpening::Redirect(navigation);
        }

        let page_id = Uuid::new_v4();
        if let Some(ids) = &ids {
            LoggingUtils::log_page_opened(&page_id.to_string(), ids.app_id, &ids.payment_key);
        }
        self.metrics.record_session_loaded();

        let entry = PageEntry {
            controller,
            navigator,
            notifier,
            last_access: Instant::now(),
        };
        let view = entry.view(page_id);
        self.pages.write().await.insert(page_id, entry);

        PageOpening::Opened(Box::new(view))
    }

    /// Current view of a held page
    pub async fn view(&self, page_id: Uuid) -> AppResult<CheckoutPageView> {
        let mut pages = self.pages.write().await;
        let entry = touch(&mut pages, page_id)?;
        Ok(entry.view(page_id))
    }

    /// Start a confirm/refresh on a held page
    pub async fn confirm(&self, page_id: Uuid) -> AppResult<CheckoutPageView> {
        let mut pages = self.pages.write().await;
        let entry = touch(&mut pages, page_id)?;
        self.metrics.record_confirm();
        entry.controller.confirm();
        Ok(entry.view(page_id))
    }

    /// Cancel a held page, leaving for the return URL or going back
    pub async fn cancel(&self, page_id: Uuid) -> AppResult<CheckoutPageView> {
        let mut pages = self.pages.write().await;
        let entry = touch(&mut pages, page_id)?;
        entry.controller.cancel();
        Ok(entry.view(page_id))
    }

    /// Tear a page down and forget it
    pub async fn close(&self, page_id: Uuid) -> AppResult<()> {
        let entry = self
            .pages
            .write()
            .await
            .remove(&page_id)
            .ok_or_else(|| page_not_found(page_id))?;
        self.retire(page_id, entry, "closed");
        Ok(())
    }

    /// Tear down pages left idle longer than the configured TTL
    pub async fn sweep(&self) -> usize {
        let ttl = self.page_ttl;
        let expired: Vec<(Uuid, PageEntry)> = {
            let mut pages = self.pages.write().await;
            let stale: Vec<Uuid> = pages
                .iter()
                .filter(|(_, entry)| entry.last_access.elapsed() >= ttl)
                .map(|(id, _)| *id)
                .collect();
            stale
                .into_iter()
                .filter_map(|id| pages.remove(&id).map(|entry| (id, entry)))
                .collect()
        };

        let count = expired.len();
        for (page_id, entry) in expired {
            self.retire(page_id, entry, "expired");
        }
        if count > 0 {
            info!(count = count, "Swept stale checkout pages");
        }
        count
    }

    /// Run `sweep` every configured interval until the handle is aborted
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let period = self.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                service.sweep().await;
            }
        })
    }

    /// Render the result page for the given route query
    pub async fn result(&self, query: &QueryParams) -> ResultPageView {
        let controller = ResultController::new(Arc::clone(&self.gateway), Arc::new(RecordingNavigator::new()));
        controller.initialize(query).await;
        result_view(&controller)
    }

    /// Leave the result page: the session's return URL, or back when there is none
    pub async fn cancel_result(&self, query: &QueryParams) -> Navigation {
        let navigator = Arc::new(RecordingNavigator::new());
        let controller = ResultController::new(Arc::clone(&self.gateway), navigator.clone());
        controller.initialize(query).await;
        controller.cancel();
        navigator.latest().unwrap_or(Navigation::Back)
    }

    pub async fn live_pages(&self) -> usize {
        self.pages.read().await.len()
    }

    fn retire(&self, page_id: Uuid, entry: PageEntry, reason: &str) {
        entry.controller.teardown();
        self.metrics.record_page_closed();
        LoggingUtils::log_page_closed(&page_id.to_string(), reason);
    }
}

/// Look up a held page and mark it as used now
fn touch(pages: &mut HashMap<Uuid, PageEntry>, page_id: Uuid) -> AppResult<&mut PageEntry> {
    let entry = pages.get_mut(&page_id).ok_or_else(|| page_not_found(page_id))?;
    entry.last_access = Instant::now();
    Ok(entry)
}

fn page_not_found(page_id: Uuid) -> AppError {
    AppError::NotFound(format!("checkout page {}", page_id))
}
