//! # Dispatcher
//!
//! Conditional notification fan-out.
//!
//! Responsibilities:
//! - Build the base payload from a message and its truthy attributes
//! - Gate every target behind its compiled conditions
//! - Merge each target's default overlay underneath an independent copy
//! - Submit all sends concurrently and wait for every one to settle

pub mod error;
pub mod merge;
pub mod metrics;
pub mod notifier;
pub mod services;

pub use contracts::{NotifyTarget, Payload, ServiceDispatcher};
pub use error::DispatcherError;
pub use merge::{add_defaults, base_payload};
pub use metrics::{MetricsSnapshot, NotifierMetrics};
pub use notifier::{ConditionalNotifier, DispatchReport};
pub use services::{LogDispatcher, MemoryDispatcher, ServiceCall};
