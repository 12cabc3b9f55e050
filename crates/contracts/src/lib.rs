//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Payload Model
//! - A notification payload is a JSON object (`Payload`)
//! - Conditions see an `EvaluationContext` built from the target configuration,
//!   never from the invocation itself

mod context;
mod error;
mod payload;
mod predicate;
mod service;
mod target;

pub use context::EvaluationContext;
pub use error::*;
pub use payload::{is_truthy, Payload};
pub use predicate::Predicate;
pub use service::{LocalServiceDispatcher, ServiceDispatcher};
pub use target::*;
