//! Infrastructure adapters module
//!
//! Implementations of the application ports: the hosted-page API client,
//! the recording navigator and the notification queue.

pub mod hosted_page_client;
pub mod navigation;
pub mod notifications;

pub use hosted_page_client::HostedPageClient;
pub use navigation::RecordingNavigator;
pub use notifications::{QueuedNotifier, UserMessage};
