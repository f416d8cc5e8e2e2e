//! HTTP server implementation for reverse proxy deployment
//!
//! This module contains the HTTP server that wires the checkout service to
//! its routes. TLS and compression are expected from the reverse proxy.

use crate::{
    application::{
        ports::{Clock, SessionGateway, SystemClock},
        services::CheckoutService,
        use_cases::HealthCheckUseCase,
    },
    config::AppConfig,
    infrastructure::{adapters::HostedPageClient, http::routes::RouteBuilder},
    shared::{
        error::{AppError, AppResult},
        metrics::CheckoutMetrics,
    },
};
use std::sync::Arc;
use tracing::{info, instrument};
use warp::{Filter, Reply};

/// HTTP server hosting the checkout pages
pub struct HttpServer {
    config: AppConfig,
    checkout_service: Arc<CheckoutService>,
    health_use_case: Arc<HealthCheckUseCase>,
    metrics: Arc<CheckoutMetrics>,
}

impl HttpServer {
    /// Create a new HTTP server backed by the configured session API
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let gateway: Arc<dyn SessionGateway> = Arc::new(HostedPageClient::new(&config.gateway)?);
        Self::with_gateway(config, gateway, Arc::new(SystemClock))
    }

    /// Create a server with an explicit session gateway and clock
    pub fn with_gateway(config: AppConfig, gateway: Arc<dyn SessionGateway>, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let metrics = Arc::new(CheckoutMetrics::new()?);
        let checkout_service = Arc::new(CheckoutService::new(&config, gateway, clock, metrics.clone()));

        Ok(Self {
            config,
            checkout_service,
            health_use_case: Arc::new(HealthCheckUseCase::new()),
            metrics,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the HTTP server until the process is stopped
    #[instrument(skip(self))]
    pub async fn run(self) -> AppResult<()> {
        let addr = self.config.server_address();
        info!("Starting hosted checkout on {}", addr);

        let addr: std::net::SocketAddr = addr
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

        let sweeper = self.checkout_service.spawn_sweeper();
        let routes = self.create_routes();

        warp::serve(routes).run(addr).await;

        sweeper.abort();
        Ok(())
    }

    /// Create the application routes
    pub fn create_routes(&self) -> impl Filter<Extract = impl Reply, Error = std::convert::Infallible> + Clone {
        RouteBuilder::build_routes(
            self.config.clone(),
            self.checkout_service.clone(),
            self.health_use_case.clone(),
            self.metrics.clone(),
        )
    }

    pub fn checkout_service(&self) -> Arc<CheckoutService> {
        self.checkout_service.clone()
    }
}
