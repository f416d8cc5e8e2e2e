use crate::{
    application::services::CheckoutService,
    config::AppConfig,
    domain::health::*,
    shared::error::AppResult,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Health check use case
pub struct HealthCheckUseCase {
    started_at: Instant,
}

impl Default for HealthCheckUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCheckUseCase {
    pub fn new() -> Self {
        Self { started_at: Instant::now() }
    }

    /// Report process health, live page count and the configured session API
    pub async fn execute(
        &self,
        config: &AppConfig,
        checkout_service: Option<Arc<CheckoutService>>,
    ) -> AppResult<HealthResponse> {
        let mut status = HealthStatus::Healthy;
        let mut details = json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
            "uptime": self.uptime(),
            "gateway": {
                "base_url": config.gateway.base_url,
                "timeout_seconds": config.gateway.timeout_seconds,
            },
        });

        match checkout_service {
            Some(service) => {
                details["live_pages"] = json!(service.live_pages().await);
            }
            None => {
                status = HealthStatus::Degraded;
                details["warnings"] = json!(["Checkout service not available for health check"]);
            }
        }

        if !config.gateway.base_url.starts_with("https://") && !is_local(&config.gateway.base_url) {
            status = HealthStatus::Degraded;
            details["warnings"] = json!(["Session API is reached over plain HTTP"]);
        }

        Ok(HealthResponse::new(status, details))
    }

    fn uptime(&self) -> String {
        let secs = self.started_at.elapsed().as_secs();
        format!("{}d {}h {}m", secs / 86400, (secs % 86400) / 3600, (secs % 3600) / 60)
    }
}

fn is_local(url: &str) -> bool {
    ["http://localhost", "http://127.0.0.1", "http://[::1]"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}
