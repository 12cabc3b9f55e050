//! EvaluationContext - variables visible to conditions
//!
//! Built fresh per target per invocation; never retained.

use serde_json::{Map, Value};

use crate::{NotifyTarget, Payload, CONTEXT_CALL, CONTEXT_ENTITY};

/// Immutable variable mapping with dotted-path lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    variables: Payload,
}

impl EvaluationContext {
    /// Create a context from raw variables
    pub fn new(variables: Payload) -> Self {
        Self { variables }
    }

    /// Build the context for one target
    ///
    /// `entity` holds the target configuration, `call` the forwarded
    /// attributes declared on it.
    pub fn for_target(target: &NotifyTarget) -> Self {
        let mut variables = Map::new();
        variables.insert(
            CONTEXT_ENTITY.to_string(),
            Value::Object(target.to_mapping()),
        );
        variables.insert(
            CONTEXT_CALL.to_string(),
            Value::Object(target.forwarded_attributes()),
        );
        Self { variables }
    }

    /// Resolve a dotted path such as `call.data.push.sound`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.variables.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
