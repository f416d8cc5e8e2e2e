//! Configuration validation module
//!
//! This module provides additional validation logic for configuration
//! beyond the basic validator crate validation.

use crate::config::AppConfig;
use crate::shared::error::AppError;

/// Configuration validator for additional validation logic
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete configuration
    pub fn validate_config(config: &AppConfig) -> crate::Result<()> {
        Self::validate_gateway_url(&config.gateway.base_url)?;
        Self::validate_path_template("session_path", &config.gateway.session_path)?;
        Self::validate_path_template("refresh_path", &config.gateway.refresh_path)?;
        Self::validate_timings(&config.checkout)?;
        Self::validate_log_format(&config.logging.format)?;

        Ok(())
    }

    /// Validate the upstream API base URL
    fn validate_gateway_url(url: &str) -> crate::Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(
                "Gateway base URL must start with http:// or https://".to_string()
            ));
        }

        if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
            tracing::warn!("Gateway base URL does not use HTTPS - payment data will travel in clear text");
        }

        Ok(())
    }

    /// Path templates must address a single session
    fn validate_path_template(name: &str, template: &str) -> crate::Result<()> {
        if !template.starts_with('/') {
            return Err(AppError::Validation(format!("{} must start with '/'", name)));
        }

        for placeholder in ["{appId}", "{paymentKey}"] {
            if !template.contains(placeholder) {
                return Err(AppError::Validation(
                    format!("{} must contain the {} placeholder", name, placeholder)
                ));
            }
        }

        Ok(())
    }

    fn validate_timings(checkout: &crate::config::app_config::CheckoutConfig) -> crate::Result<()> {
        if checkout.sweep_interval_seconds > checkout.page_ttl_seconds {
            return Err(AppError::Validation(
                "Sweep interval cannot be longer than the page TTL".to_string()
            ));
        }

        Ok(())
    }

    fn validate_log_format(format: &str) -> crate::Result<()> {
        match format.to_ascii_lowercase().as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(AppError::Validation(format!("Invalid log format: {}", other))),
        }
    }
}
