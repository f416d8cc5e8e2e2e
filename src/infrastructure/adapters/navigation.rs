//! Recording navigator
//!
//! Server-side pages cannot move a browser themselves. Navigations are
//! recorded and turned into redirects by the HTTP layer.

use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::application::ports::Navigator;
use crate::domain::checkout::CheckoutIdentifiers;
use crate::domain::routes::{Navigation, Route};

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, navigation: Navigation) {
        debug!(navigation = ?navigation, "Navigation requested");
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(navigation);
    }

    /// Most recent navigation, if any
    pub fn latest(&self) -> Option<Navigation> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Every navigation in the order requested
    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route, query: Option<CheckoutIdentifiers>, replace: bool) {
        self.record(Navigation::to_route(route, query, replace));
    }

    fn go_back(&self) {
        self.record(Navigation::Back);
    }

    fn redirect_browser(&self, url: &str) {
        self.record(Navigation::External { url: url.to_string() });
    }
}
