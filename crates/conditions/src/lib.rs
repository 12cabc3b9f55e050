//! # Conditions
//!
//! Condition evaluation for notify targets.
//!
//! Responsibilities:
//! - Compile declarative condition expressions into `Predicate`s once, at load time
//! - AND a target's conditions in declared order with short-circuit on `false`
//! - Aggregate evaluation errors and report them as warnings
//!
//! # Example
//!
//! ```
//! use conditions::ConditionChecker;
//! use contracts::{EvaluationContext, NotifyTarget};
//! use serde_json::json;
//!
//! let target = NotifyTarget::new("notify.phone").with_title("Alarm");
//! let checker = ConditionChecker::compile(
//!     &target.service,
//!     &[json!({"condition": "state", "path": "call.title", "state": "Alarm"})],
//! )
//! .unwrap();
//! assert!(checker.evaluate(&EvaluationContext::for_target(&target)).qualifies());
//! ```

mod checker;
mod compiler;
mod error;

pub use checker::{ConditionChecker, EvaluationOutcome, Exclusion};
pub use compiler::compile;
pub use error::CompileError;
