//! Predicate trait - compiled condition interface
//!
//! The dispatcher only sees this trait; the condition grammar lives elsewhere.

use crate::{ConditionError, EvaluationContext};

/// A compiled boolean condition over an immutable context.
///
/// Returns `Ok(true)`, `Ok(false)` or an evaluation error.
pub trait Predicate: Send + Sync {
    fn check(&self, context: &EvaluationContext) -> Result<bool, ConditionError>;
}

impl<F> Predicate for F
where
    F: Fn(&EvaluationContext) -> Result<bool, ConditionError> + Send + Sync,
{
    fn check(&self, context: &EvaluationContext) -> Result<bool, ConditionError> {
        self(context)
    }
}
