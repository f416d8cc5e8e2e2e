//! HTTP route handlers module
//!
//! This module contains separate route handlers for different endpoint types,
//! organized by functionality to improve maintainability and testability.

pub mod checkout;
pub mod health;
pub mod metrics;

pub use checkout::{
    handle_cancel, handle_cancel_result, handle_close, handle_confirm, handle_get_page, handle_not_found, handle_open_checkout,
    handle_result, handle_unmatched,
};
pub use health::handle_health_request;
pub use metrics::handle_prometheus_request;
