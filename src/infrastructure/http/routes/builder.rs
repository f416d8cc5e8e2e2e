//! Route builder module
//!
//! This module contains the main route builder that orchestrates the creation
//! of all application routes.

use crate::{
    application::{services::CheckoutService, use_cases::HealthCheckUseCase},
    config::AppConfig,
    infrastructure::http::{
        responses::ResponseFormatter,
        routes::{CheckoutRoutes, HealthRoutes, MetricsRoutes},
    },
    shared::metrics::CheckoutMetrics,
};
use std::sync::Arc;
use warp::Filter;

/// Route builder that orchestrates the creation of all application routes
pub struct RouteBuilder;

impl RouteBuilder {
    /// Build all application routes
    pub fn build_routes(
        config: AppConfig,
        checkout_service: Arc<CheckoutService>,
        health_use_case: Arc<HealthCheckUseCase>,
        metrics: Arc<CheckoutMetrics>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        let open_route = CheckoutRoutes::create_open_route(checkout_service.clone());
        let page_route = CheckoutRoutes::create_page_route(checkout_service.clone());
        let action_routes = CheckoutRoutes::create_action_routes(&config, checkout_service.clone());
        let result_route = CheckoutRoutes::create_result_route(checkout_service.clone());
        let result_cancel_route = CheckoutRoutes::create_result_cancel_route(&config, checkout_service.clone());

        let health_route = HealthRoutes::create_health_route(config, health_use_case, checkout_service);
        let prometheus_route = MetricsRoutes::create_prometheus_route(metrics);

        // Combine all routes; the unmatched-path fallback goes last
        open_route
            .or(page_route)
            .or(action_routes)
            .or(result_route)
            .or(result_cancel_route)
            .or(CheckoutRoutes::create_not_found_route())
            .or(health_route)
            .or(prometheus_route)
            .or(CheckoutRoutes::create_fallback_route())
            .recover(ResponseFormatter::handle_rejection)
    }
}
