//! Metrics utilities module
//!
//! Prometheus counters for the checkout page lifecycle.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::shared::error::AppResult;

/// Checkout lifecycle metrics backed by a private Prometheus registry
pub struct CheckoutMetrics {
    registry: Registry,
    pages_opened: IntCounter,
    sessions_loaded: IntCounter,
    result_redirects: IntCounter,
    not_found_redirects: IntCounter,
    confirm_requests: IntCounter,
    pages_closed: IntCounter,
    live_pages: IntGauge,
}

impl CheckoutMetrics {
    /// Create and register all checkout metrics
    pub fn new() -> AppResult<Self> {
        let registry = Registry::new();

        let pages_opened = IntCounter::new(
            "checkout_pages_opened_total",
            "Checkout pages opened from query parameters",
        )?;
        let sessions_loaded = IntCounter::new(
            "checkout_sessions_loaded_total",
            "Pending payment sessions loaded into the create view",
        )?;
        let result_redirects = IntCounter::new(
            "checkout_result_redirects_total",
            "Pages redirected to the result view because the session was no longer pending",
        )?;
        let not_found_redirects = IntCounter::new(
            "checkout_not_found_redirects_total",
            "Pages redirected to not-found after a parameter or fetch failure",
        )?;
        let confirm_requests = IntCounter::new(
            "checkout_confirm_requests_total",
            "Confirm/refresh actions started by payers",
        )?;
        let pages_closed = IntCounter::new(
            "checkout_pages_closed_total",
            "Checkout pages torn down",
        )?;
        let live_pages = IntGauge::new("checkout_live_pages", "Checkout pages currently held")?;

        registry.register(Box::new(pages_opened.clone()))?;
        registry.register(Box::new(sessions_loaded.clone()))?;
        registry.register(Box::new(result_redirects.clone()))?;
        registry.register(Box::new(not_found_redirects.clone()))?;
        registry.register(Box::new(confirm_requests.clone()))?;
        registry.register(Box::new(pages_closed.clone()))?;
        registry.register(Box::new(live_pages.clone()))?;

        Ok(Self {
            registry,
            pages_opened,
            sessions_loaded,
            result_redirects,
            not_found_redirects,
            confirm_requests,
            pages_closed,
            live_pages,
        })
    }

    pub fn record_page_opened(&self) {
        self.pages_opened.inc();
    }

    pub fn record_session_loaded(&self) {
        self.sessions_loaded.inc();
        self.live_pages.inc();
    }

    pub fn record_result_redirect(&self) {
        self.result_redirects.inc();
    }

    pub fn record_not_found_redirect(&self) {
        self.not_found_redirects.inc();
    }

    pub fn record_confirm(&self) {
        self.confirm_requests.inc();
    }

    pub fn record_page_closed(&self) {
        self.pages_closed.inc();
        self.live_pages.dec();
    }

    pub fn live_pages(&self) -> i64 {
        self.live_pages.get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
