//! Application services - Orchestration of checkout pages

pub mod checkout_service;

pub use checkout_service::{CheckoutPageView, CheckoutService, PageOpening, ResultPageView};
