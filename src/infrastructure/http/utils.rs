//! HTTP utilities - Common helper functions
//!
//! Filters that inject shared state into handlers, and request guards.

use crate::application::services::CheckoutService;
use crate::application::use_cases::HealthCheckUseCase;
use crate::config::AppConfig;
use crate::shared::error::AppError;
use crate::shared::metrics::CheckoutMetrics;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

/// Helper function to inject config into filters
pub fn with_config(config: AppConfig) -> impl Filter<Extract = (AppConfig,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

/// Helper function to inject the checkout service into filters
pub fn with_checkout_service(
    service: Arc<CheckoutService>,
) -> impl Filter<Extract = (Arc<CheckoutService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Helper function to inject the health use case into filters
pub fn with_health_use_case(
    health_use_case: Arc<HealthCheckUseCase>,
) -> impl Filter<Extract = (Arc<HealthCheckUseCase>,), Error = Infallible> + Clone {
    warp::any().map(move || health_use_case.clone())
}

/// Helper function to inject metrics into filters
pub fn with_metrics(
    metrics: Arc<CheckoutMetrics>,
) -> impl Filter<Extract = (Arc<CheckoutMetrics>,), Error = Infallible> + Clone {
    warp::any().map(move || metrics.clone())
}

/// Reject requests whose declared body is larger than `limit` bytes.
/// A missing content-length is accepted; these routes read no body.
pub fn with_body_limit(limit: u64) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(move |length: Option<u64>| async move {
            match length {
                Some(length) if length > limit => Err(warp::reject::custom(AppError::Validation(format!(
                    "Request too large: {} bytes exceeds limit of {} bytes",
                    length, limit
                )))),
                _ => Ok(()),
            }
        })
        .untuple_one()
}
