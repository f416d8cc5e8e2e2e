//! Logging utilities module
//!
//! This module provides centralized logging functionality and utilities.

use tracing::{error, info, warn};

use crate::shared::error::AppError;

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str, format: &str, structured: bool) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let builder = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let result = if structured && format.eq_ignore_ascii_case("json") {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        };

        result.map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }

    /// Log a page opening with structured data
    pub fn log_page_opened(page_id: &str, app_id: i64, payment_key: &str) {
        info!(
            page_id = %page_id,
            app_id = %app_id,
            payment_key = %payment_key,
            "Checkout page opened"
        );
    }

    /// Log a page teardown
    pub fn log_page_closed(page_id: &str, reason: &str) {
        info!(
            page_id = %page_id,
            reason = %reason,
            "Checkout page closed"
        );
    }

    /// Log a failure that ended a page before it could load
    pub fn log_page_failed(error: &AppError) {
        error!(
            error = %error,
            upstream = error.is_upstream(),
            "Checkout page failed to load"
        );
    }

    /// Log an unmatched route that is being sent to the not-found page
    pub fn log_unmatched_route(path: &str) {
        warn!(path = %path, "Unmatched route, redirecting to not-found");
    }
}
