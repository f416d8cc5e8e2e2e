//! Domain layer - Core checkout logic and domain models
//!
//! This module contains the payment session model, the countdown engine, the
//! QR payload generator and page routing. None of it performs I/O.

pub mod checkout;
pub mod countdown;
pub mod health;
pub mod qr;
pub mod routes;
pub mod session;
pub mod tokens;

pub use checkout::{CheckoutIdentifiers, CheckoutState, DisplayMode, QueryParams};
pub use countdown::{Countdown, CountdownDisplay, TickOutcome, UrgencyLevel};
pub use health::{HealthResponse, HealthStatus};
pub use qr::payment_uri;
pub use routes::{Navigation, Route};
pub use session::{PaymentClassification, PaymentSession, SessionTime};
pub use tokens::TokenInfo;
