//! HTTP models - Infrastructure concerns
//!
//! Wire bodies that only exist at the HTTP boundary. Page views themselves
//! are produced by the checkout service.

use serde::{Deserialize, Serialize};

use crate::domain::routes::Navigation;
use crate::shared::error::AppError;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Human-readable error message
    pub error: String,

    /// Set when the error came from the upstream session API
    #[serde(default)]
    pub upstream: bool,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), upstream: false }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            status: err.http_status_code().as_u16(),
            error: err.to_string(),
            upstream: err.is_upstream(),
        }
    }
}

/// Body returned when a page wants to navigate but no redirect can express it
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub navigation: Navigation,
}
