//! Hosted Checkout - A hosted page for paying a crypto payment session
//!
//! This library resolves a payment session from its identifiers, counts down
//! to its expiry, renders a wallet payment URI for the QR code, and handles
//! the payer's confirm and cancel actions, served over HTTP.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod shared;

#[cfg(test)]
mod tests;

pub use application::{CheckoutController, ResultController};
pub use config::AppConfig;
pub use infrastructure::http::HttpServer;
pub use shared::error::{AppError, AppResult};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::AppError>;
