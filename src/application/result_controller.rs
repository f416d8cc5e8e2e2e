//! Result page controller
//!
//! Shows a session that is no longer pending. Fetches once and never
//! navigates on failure; a missing session is presented as not found.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::error;

use crate::application::ports::{Navigator, SessionGateway};
use crate::domain::checkout::{CheckoutIdentifiers, DisplayMode, QueryParams};
use crate::domain::session::{PaymentClassification, PaymentSession};

/// Result page state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub title: &'static str,
    pub is_loading: bool,
    pub session: Option<PaymentSession>,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            title: DisplayMode::Result.title(),
            is_loading: true,
            session: None,
        }
    }
}

pub struct ResultController {
    gateway: Arc<dyn SessionGateway>,
    navigator: Arc<dyn Navigator>,
    view: watch::Sender<ResultView>,
}

impl ResultController {
    pub fn new(gateway: Arc<dyn SessionGateway>, navigator: Arc<dyn Navigator>) -> Self {
        let (view, _) = watch::channel(ResultView::default());
        Self { gateway, navigator, view }
    }

    /// Fetch the session named by `query` once
    pub async fn initialize(&self, query: &QueryParams) {
        let session = match CheckoutIdentifiers::from_query(query) {
            Ok(ids) => self
                .gateway
                .fetch_session(ids.app_id, &ids.payment_key)
                .await
                .map_err(|err| {
                    error!(error = %err, app_id = ids.app_id, "Error fetching payment session in result page");
                })
                .ok(),
            Err(err) => {
                error!(error = %err, "Error fetching payment session in result page");
                None
            }
        };

        self.view.send_modify(|view| {
            view.session = session;
            view.is_loading = false;
        });
    }

    pub fn cancel(&self) {
        match self.session().as_ref().and_then(PaymentSession::return_url) {
            Some(url) => self.navigator.redirect_browser(url),
            None => self.navigator.go_back(),
        }
    }

    pub fn view(&self) -> ResultView {
        self.view.borrow().clone()
    }

    pub fn session(&self) -> Option<PaymentSession> {
        self.view.borrow().session.clone()
    }

    pub fn classification(&self) -> PaymentClassification {
        let view = self.view.borrow();
        PaymentClassification::from_state(view.session.as_ref().and_then(|s| s.payment_state.as_deref()))
    }
}
