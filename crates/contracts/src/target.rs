//! NotifyTarget - one configured destination notify service
//!
//! Holds the service identifier, its gating conditions and the default
//! payload overlay.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::Payload;

/// Domain every target service lives in
pub const NOTIFY_DOMAIN: &str = "notify";

/// Payload attribute carrying the message body
pub const ATTR_MESSAGE: &str = "message";
/// Payload attribute carrying the title
pub const ATTR_TITLE: &str = "title";
/// Payload attribute carrying the addressing target
pub const ATTR_TARGET: &str = "target";
/// Payload attribute carrying free-form data
pub const ATTR_DATA: &str = "data";

/// Attributes of a target that are exposed to its conditions as `call.*`
pub const FORWARDED_ATTRIBUTES: [&str; 4] = [ATTR_MESSAGE, ATTR_TITLE, ATTR_TARGET, ATTR_DATA];

/// Context key holding the target configuration
pub const CONTEXT_ENTITY: &str = "entity";
/// Context key holding the forwarded attributes
pub const CONTEXT_CALL: &str = "call";

/// Platform configuration: the ordered target list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Targets, evaluated in order
    pub services: Vec<NotifyTarget>,
}

/// Target configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyTarget {
    /// Service identifier (e.g., "notify.mobile_app_phone")
    pub service: String,

    /// Ordered condition expressions, ANDed together
    #[serde(default, deserialize_with = "one_or_many")]
    pub condition: Vec<Value>,

    /// Message attribute visible to conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Title attribute visible to conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Addressing target (string or list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,

    /// Default payload overlay, merged underneath every outgoing payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

impl NotifyTarget {
    /// Create a target with no conditions and no overlay
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            condition: Vec::new(),
            message: None,
            title: None,
            target: None,
            data: None,
        }
    }

    /// Builder: append a condition expression
    pub fn with_condition(mut self, condition: Value) -> Self {
        self.condition.push(condition);
        self
    }

    /// Builder: set the default payload overlay
    pub fn with_data(mut self, data: Payload) -> Self {
        self.data = Some(data);
        self
    }

    /// Builder: set the title attribute
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether any condition is declared
    pub fn has_conditions(&self) -> bool {
        !self.condition.is_empty()
    }

    /// Service name without the `notify.` prefix
    ///
    /// Returns `None` when the identifier is outside the notify domain or
    /// the remaining name is empty.
    pub fn service_name(&self) -> Option<&str> {
        self.service
            .strip_prefix(NOTIFY_DOMAIN)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|name| !name.is_empty())
    }

    /// Forwarded attributes present on this target
    pub fn forwarded_attributes(&self) -> Payload {
        let mut attrs = Map::new();
        for key in FORWARDED_ATTRIBUTES {
            if let Some(value) = self.attribute(key) {
                attrs.insert(key.to_string(), value);
            }
        }
        attrs
    }

    /// The target configuration as a JSON object
    pub fn to_mapping(&self) -> Payload {
        let mut map = Map::new();
        map.insert("service".to_string(), Value::String(self.service.clone()));
        map.insert(
            "condition".to_string(),
            Value::Array(self.condition.clone()),
        );
        map.extend(self.forwarded_attributes());
        map
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            ATTR_MESSAGE => self.message.clone().map(Value::String),
            ATTR_TITLE => self.title.clone().map(Value::String),
            ATTR_TARGET => self.target.clone(),
            ATTR_DATA => self.data.clone().map(Value::Object),
            _ => None,
        }
    }
}

/// Accept either a single value or a list of values
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        single => Ok(vec![single]),
    }
}
