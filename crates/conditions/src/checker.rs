//! ConditionChecker - ANDs a target's conditions
//!
//! Evaluation rules:
//! - Conditions run in declared order
//! - The first explicit `false` stops evaluation and excludes the target
//! - Errors are collected and evaluation continues
//! - Errors without any `false` still exclude the target

use contracts::{ConditionError, EvaluationContext, Predicate};
use serde_json::Value;
use tracing::{debug_span, warn};

use crate::compiler::compile;
use crate::error::CompileError;

/// Why a target was excluded
#[derive(Debug)]
pub enum Exclusion {
    /// Condition at `index` evaluated to `false`
    ConditionFalse { index: usize },
    /// One or more conditions errored and none returned `false`
    EvaluationFailed(ConditionError),
}

/// Gating outcome for one target on one invocation
#[derive(Debug)]
pub enum EvaluationOutcome {
    Qualifies,
    Excluded(Exclusion),
}

impl EvaluationOutcome {
    /// Whether the target may be sent to
    pub fn qualifies(&self) -> bool {
        matches!(self, Self::Qualifies)
    }

    /// Aggregate evaluation error, if any
    pub fn error(&self) -> Option<&ConditionError> {
        match self {
            Self::Excluded(Exclusion::EvaluationFailed(e)) => Some(e),
            _ => None,
        }
    }
}

/// Compiled, ordered condition list of one target
pub struct ConditionChecker {
    label: String,
    predicates: Vec<Box<dyn Predicate>>,
}

impl ConditionChecker {
    /// Compile every expression of a condition list
    ///
    /// `label` names the target in diagnostics.
    ///
    /// # Errors
    /// Returns the first compile error, tagged with the condition index.
    pub fn compile(label: impl Into<String>, configs: &[Value]) -> Result<Self, CompileError> {
        let predicates = configs
            .iter()
            .enumerate()
            .map(|(index, config)| compile(config).map_err(|e| CompileError::nested(index, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            label: label.into(),
            predicates,
        })
    }

    /// Build a checker from already compiled predicates
    pub fn from_predicates(label: impl Into<String>, predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            label: label.into(),
            predicates,
        }
    }

    /// Evaluate all conditions against `context`
    ///
    /// Never fails: errors resolve to `Excluded` and are logged at warn level.
    pub fn evaluate(&self, context: &EvaluationContext) -> EvaluationOutcome {
        let total = self.predicates.len();
        let mut errors = Vec::new();

        for (index, predicate) in self.predicates.iter().enumerate() {
            let _span = debug_span!("condition", index).entered();
            match predicate.check(context) {
                Ok(true) => {}
                Ok(false) => return EvaluationOutcome::Excluded(Exclusion::ConditionFalse { index }),
                Err(e) => errors.push(ConditionError::indexed("condition", index, total, e)),
            }
        }

        if errors.is_empty() {
            return EvaluationOutcome::Qualifies;
        }

        let error = ConditionError::container("condition", errors);
        warn!(
            target_service = %self.label,
            error = %error,
            "Error evaluating condition"
        );
        EvaluationOutcome::Excluded(Exclusion::EvaluationFailed(error))
    }
}

impl std::fmt::Debug for ConditionChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionChecker")
            .field("label", &self.label)
            .field("conditions", &self.predicates.len())
            .finish()
    }
}
