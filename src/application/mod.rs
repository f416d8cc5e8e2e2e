//! Application layer - Page controllers and application services
//!
//! This module contains the checkout and result page controllers, the
//! capability traits they consume, and the services that hold live pages.

pub mod checkout_controller;
pub mod countdown_timer;
pub mod ports;
pub mod result_controller;
pub mod services;
pub mod task_slot;
pub mod use_cases;

pub use checkout_controller::{CheckoutController, CheckoutDeps, CheckoutTimings, CheckoutView};
pub use countdown_timer::CountdownTimer;
pub use ports::{Clock, MessageKind, Navigator, Notifier, SessionGateway, SystemClock};
pub use result_controller::{ResultController, ResultView};
pub use services::*;
pub use use_cases::*;
