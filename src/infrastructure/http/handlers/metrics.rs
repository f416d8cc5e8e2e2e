//! Metrics handler module

use crate::shared::metrics::CheckoutMetrics;
use crate::middleware::security_headers::with_security_headers;
use std::sync::Arc;
use warp::reply::Response;

/// Handle Prometheus metrics requests
pub async fn handle_prometheus_request(
    metrics: Arc<CheckoutMetrics>,
) -> Result<Response, warp::reject::Rejection> {
    Ok(with_security_headers(warp::reply::with_header(
        metrics.gather(),
        "Content-Type",
        "text/plain; version=0.0.4; charset=utf-8",
    )))
}
