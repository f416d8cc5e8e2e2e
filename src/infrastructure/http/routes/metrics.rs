//! Metrics routes module

use crate::{
    infrastructure::http::{handlers::handle_prometheus_request, utils::with_metrics},
    shared::metrics::CheckoutMetrics,
};
use std::sync::Arc;
use warp::Filter;

/// Metrics routes configuration
pub struct MetricsRoutes;

impl MetricsRoutes {
    /// Create the Prometheus metrics endpoint route
    pub fn create_prometheus_route(
        metrics: Arc<CheckoutMetrics>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("metrics")
            .and(warp::get())
            .and(with_metrics(metrics))
            .and_then(handle_prometheus_request)
    }
}
