//! Test suite for the hosted checkout
//!
//! - `common`: scripted session gateway, paused clock and session fixtures
//! - `unit`: controller behaviour driven under paused tokio time
//! - `integration`: HTTP routes exercised through `warp::test`

pub mod common;
pub mod unit;

/// Test configuration and utilities
pub mod config {
    use crate::config::AppConfig;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test tracing once per process
    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_test_writer()
                .try_init();
        });
    }

    /// Create test configuration
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.port = 18080;
        config.logging.format = "pretty".to_string();
        config.checkout.page_ttl_seconds = 60;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_initialization() {
        config::init();
        let test_config = config::test_config();
        assert_eq!(test_config.server.port, 18080);
        assert_eq!(test_config.checkout.page_ttl_seconds, 60);
        assert!(test_config.validate_config().is_ok());
    }
}
