//! Infrastructure layer - External concerns and adapters
//!
//! This module contains the adapters behind the application ports and the
//! HTTP surface.

pub mod adapters;
pub mod http;

pub use adapters::{HostedPageClient, QueuedNotifier, RecordingNavigator};
