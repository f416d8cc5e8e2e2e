//! Application configuration structures
//!
//! This module contains the main configuration structures for the application.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use validator::Validate;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server address to bind to
    pub bind_address: IpAddr,

    /// Server port
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Maximum request size in bytes
    #[validate(range(min = 1024, max = 10485760))] // 1KB to 10MB
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            max_request_size: 64 * 1024,
        }
    }
}

/// Upstream hosted-page API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the payment API
    #[validate(url)]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,

    /// Path template for fetching a session; `{appId}` and `{paymentKey}` are substituted
    #[validate(length(min = 1))]
    pub session_path: String,

    /// Path template for refreshing a session's payment status
    #[validate(length(min = 1))]
    pub refresh_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_seconds: 15,
            session_path: "/api/hosted-page/{appId}/{paymentKey}".to_string(),
            refresh_path: "/api/hosted-page/{appId}/{paymentKey}/refresh-status".to_string(),
        }
    }
}

/// Checkout page timing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Delay between a successful confirm and the merchant redirect (ms)
    #[validate(range(max = 60000))]
    pub confirm_redirect_delay_ms: u64,

    /// Delay between countdown expiry and the merchant redirect (ms)
    #[validate(range(max = 60000))]
    pub expiry_redirect_delay_ms: u64,

    /// Countdown tick period (ms)
    #[validate(range(min = 50, max = 60000))]
    pub tick_interval_ms: u64,

    /// How long an idle page is kept before it is swept (seconds)
    #[validate(range(min = 60, max = 86400))]
    pub page_ttl_seconds: u64,

    /// How often the page sweeper runs (seconds)
    #[validate(range(min = 1, max = 3600))]
    pub sweep_interval_seconds: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            confirm_redirect_delay_ms: 1500,
            expiry_redirect_delay_ms: 5000,
            tick_interval_ms: 1000,
            page_ttl_seconds: 3600,
            sweep_interval_seconds: 60,
        }
    }
}

impl CheckoutConfig {
    pub fn confirm_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_redirect_delay_ms)
    }

    pub fn expiry_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.expiry_redirect_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,

    /// Log format ("json" or "pretty")
    #[validate(length(min = 1))]
    pub format: String,

    /// Enable structured logging
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            structured: true,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream payment API
    pub gateway: GatewayConfig,

    /// Checkout page timings
    pub checkout: CheckoutConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(
                config::Environment::with_prefix("HOSTED_CHECKOUT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to build configuration: {}", e)))?;

        let config: AppConfig = config.try_deserialize()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        // Validate configuration
        config.validate_config()
            .map_err(|e| crate::shared::error::AppError::Validation(format!("Configuration validation failed: {}", e)))?;
        crate::config::ConfigValidator::validate_config(&config)?;

        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        self.server.validate()?;
        self.gateway.validate()?;
        self.checkout.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
