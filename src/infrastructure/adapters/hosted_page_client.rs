//! Hosted-page API client
//!
//! HTTP implementation of [`SessionGateway`] against the payment API that
//! owns the sessions. One attempt per call; retry policy is the caller's.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    application::ports::SessionGateway,
    config::app_config::GatewayConfig,
    domain::session::PaymentSession,
    shared::error::{AppError, AppResult},
};

const APP_ID_PLACEHOLDER: &str = "{appId}";
const PAYMENT_KEY_PLACEHOLDER: &str = "{paymentKey}";

/// Adapter for the upstream hosted-page endpoints
pub struct HostedPageClient {
    client: Client,
    base_url: Url,
    session_path: String,
    refresh_path: String,
}

impl HostedPageClient {
    /// Create a new client from gateway configuration
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Config(format!("Invalid gateway base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("Gateway base URL cannot carry a path: {}", config.base_url)));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session_path: config.session_path.clone(),
            refresh_path: config.refresh_path.clone(),
        })
    }

    /// Expand a path template into a full URL. Each path segment is
    /// percent-encoded, so a payment key cannot escape its segment.
    pub fn endpoint(&self, template: &str, app_id: i64, payment_key: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::Config("Gateway base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|segment| !segment.is_empty()) {
                let segment = segment
                    .replace(APP_ID_PLACEHOLDER, &app_id.to_string())
                    .replace(PAYMENT_KEY_PLACEHOLDER, payment_key);
                segments.push(&segment);
            }
        }
        Ok(url)
    }

    async fn request_session(&self, method: Method, url: Url) -> AppResult<PaymentSession> {
        debug!(method = %method, url = %url, "Requesting payment session");

        let response = self.client.request(method, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Http {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    message
                },
            });
        }

        Ok(response.json::<PaymentSession>().await?)
    }
}

#[async_trait]
impl SessionGateway for HostedPageClient {
    async fn fetch_session(&self, app_id: i64, payment_key: &str) -> AppResult<PaymentSession> {
        let url = self.endpoint(&self.session_path, app_id, payment_key)?;
        self.request_session(Method::GET, url).await
    }

    async fn refresh_status(&self, app_id: i64, payment_key: &str) -> AppResult<PaymentSession> {
        info!(app_id = app_id, "Refreshing payment status");
        let url = self.endpoint(&self.refresh_path, app_id, payment_key)?;
        self.request_session(Method::POST, url).await
    }
}
