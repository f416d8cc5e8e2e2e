//! Use cases - Application operations outside the page lifecycle

pub mod health_check;

pub use health_check::HealthCheckUseCase;
