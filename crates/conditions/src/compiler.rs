//! Condition grammar compiler
//!
//! Grammar (JSON/TOML):
//! - `true` / `false`
//! - `{ condition = "and" | "or" | "not", conditions = [...] }`
//! - `{ condition = "state", path = "...", state = value | [values] }`
//! - `{ condition = "numeric", path = "...", above = n, below = n }`
//! - `{ condition = "exists", path = "..." }`
//! - `{ condition = "match", path = "...", pattern = "regex" }`
//!
//! Any mapping form accepts `enabled = false`, which makes it always pass.

use contracts::{ConditionError, EvaluationContext, Predicate};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CompileError;

/// Compile one condition expression into a predicate
///
/// # Errors
/// Returns `CompileError` when the expression is structurally invalid.
pub fn compile(config: &Value) -> Result<Box<dyn Predicate>, CompileError> {
    Ok(Box::new(compile_condition(config)?))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case", deny_unknown_fields)]
enum ConditionConfig {
    And {
        conditions: Vec<Value>,
    },
    Or {
        conditions: Vec<Value>,
    },
    Not {
        conditions: Vec<Value>,
    },
    State {
        path: String,
        state: Value,
    },
    Numeric {
        path: String,
        #[serde(default)]
        above: Option<f64>,
        #[serde(default)]
        below: Option<f64>,
    },
    Exists {
        path: String,
    },
    Match {
        path: String,
        pattern: String,
    },
}

/// Compiled condition tree
#[derive(Debug)]
enum Condition {
    Literal(bool),
    Disabled,
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Vec<Condition>),
    State {
        path: String,
        states: Vec<Value>,
    },
    Numeric {
        path: String,
        above: Option<f64>,
        below: Option<f64>,
    },
    Exists {
        path: String,
    },
    Match {
        path: String,
        regex: Regex,
    },
}

fn compile_condition(config: &Value) -> Result<Condition, CompileError> {
    let map = match config {
        Value::Bool(b) => return Ok(Condition::Literal(*b)),
        Value::Object(map) => map,
        other => {
            return Err(CompileError::UnsupportedType {
                found: type_name(other).to_string(),
            })
        }
    };

    let mut map = map.clone();
    let enabled = match map.remove("enabled") {
        None => true,
        Some(Value::Bool(b)) => b,
        Some(other) => {
            return Err(CompileError::schema(format!(
                "'enabled' must be a boolean, got {}",
                type_name(&other)
            )))
        }
    };

    let parsed: ConditionConfig = serde_json::from_value(Value::Object(map))
        .map_err(|e| CompileError::schema(e.to_string()))?;

    // Disabled conditions are still validated
    let condition = match parsed {
        ConditionConfig::And { conditions } => Condition::And(compile_group("and", &conditions)?),
        ConditionConfig::Or { conditions } => Condition::Or(compile_group("or", &conditions)?),
        ConditionConfig::Not { conditions } => Condition::Not(compile_group("not", &conditions)?),
        ConditionConfig::State { path, state } => Condition::State {
            path: check_path(path)?,
            states: match state {
                Value::Array(states) => states,
                single => vec![single],
            },
        },
        ConditionConfig::Numeric { path, above, below } => {
            if above.is_none() && below.is_none() {
                return Err(CompileError::MissingBound { path });
            }
            Condition::Numeric {
                path: check_path(path)?,
                above,
                below,
            }
        }
        ConditionConfig::Exists { path } => Condition::Exists {
            path: check_path(path)?,
        },
        ConditionConfig::Match { path, pattern } => {
            let regex = Regex::new(&pattern)
                .map_err(|source| CompileError::InvalidPattern { pattern, source })?;
            Condition::Match {
                path: check_path(path)?,
                regex,
            }
        }
    };

    Ok(if enabled { condition } else { Condition::Disabled })
}

fn compile_group(kind: &str, configs: &[Value]) -> Result<Vec<Condition>, CompileError> {
    if configs.is_empty() {
        return Err(CompileError::EmptyGroup {
            kind: kind.to_string(),
        });
    }
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| {
            compile_condition(config).map_err(|e| CompileError::nested(index, e))
        })
        .collect()
}

fn check_path(path: String) -> Result<String, CompileError> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(CompileError::InvalidPath { path });
    }
    Ok(path)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

impl Predicate for Condition {
    fn check(&self, context: &EvaluationContext) -> Result<bool, ConditionError> {
        match self {
            Self::Literal(b) => Ok(*b),
            Self::Disabled => Ok(true),
            Self::And(conditions) => check_and(conditions, context),
            Self::Or(conditions) => check_or(conditions, context),
            Self::Not(conditions) => check_not(conditions, context),
            Self::State { path, states } => {
                let actual = lookup(context, path)?;
                Ok(states.iter().any(|state| state == actual))
            }
            Self::Numeric { path, above, below } => {
                let actual = as_number(path, lookup(context, path)?)?;
                if above.is_some_and(|above| actual <= above) {
                    return Ok(false);
                }
                if below.is_some_and(|below| actual >= below) {
                    return Ok(false);
                }
                Ok(true)
            }
            Self::Exists { path } => Ok(context.get(path).is_some()),
            Self::Match { path, regex } => match lookup(context, path)? {
                Value::String(s) => Ok(regex.is_match(s)),
                other => Err(ConditionError::invalid_value(
                    path,
                    format!("expected a string, got {}", type_name(other)),
                )),
            },
        }
    }
}

fn check_and(conditions: &[Condition], context: &EvaluationContext) -> Result<bool, ConditionError> {
    let mut errors = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        match condition.check(context) {
            Ok(false) => return Ok(false),
            Ok(true) => {}
            Err(e) => errors.push(ConditionError::indexed("and", index, conditions.len(), e)),
        }
    }
    if errors.is_empty() {
        Ok(true)
    } else {
        Err(ConditionError::container("and", errors))
    }
}

fn check_or(conditions: &[Condition], context: &EvaluationContext) -> Result<bool, ConditionError> {
    let mut errors = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        match condition.check(context) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => errors.push(ConditionError::indexed("or", index, conditions.len(), e)),
        }
    }
    if errors.is_empty() {
        Ok(false)
    } else {
        Err(ConditionError::container("or", errors))
    }
}

fn check_not(conditions: &[Condition], context: &EvaluationContext) -> Result<bool, ConditionError> {
    let mut errors = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        match condition.check(context) {
            Ok(true) => return Ok(false),
            Ok(false) => {}
            Err(e) => errors.push(ConditionError::indexed("not", index, conditions.len(), e)),
        }
    }
    if errors.is_empty() {
        Ok(true)
    } else {
        Err(ConditionError::container("not", errors))
    }
}

fn lookup<'a>(context: &'a EvaluationContext, path: &str) -> Result<&'a Value, ConditionError> {
    context
        .get(path)
        .ok_or_else(|| ConditionError::unknown_reference(path))
}

fn as_number(path: &str, value: &Value) -> Result<f64, ConditionError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ConditionError::invalid_value(path, "number out of range")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ConditionError::invalid_value(path, format!("'{s}' is not a number"))
        }),
        other => Err(ConditionError::invalid_value(
            path,
            format!("expected a number, got {}", type_name(other)),
        )),
    }
}
