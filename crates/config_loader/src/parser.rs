//! Target list (de)serialization in TOML and JSON.

use std::path::Path;

use contracts::ContractError;

use crate::NotifyConfig;

/// Config file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Infer format from a file path
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse(format!(
                "{}: cannot determine file format without an extension",
                path.display()
            ))
        })?;

        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!(
                "{}: unsupported config format: .{ext}",
                path.display()
            ))
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// Deserialize a target list
    pub fn parse(self, content: &str) -> Result<NotifyConfig, ContractError> {
        let parsed = match self {
            Self::Toml => toml::from_str(content).map_err(boxed),
            Self::Json => serde_json::from_str(content).map_err(boxed),
        };
        parsed.map_err(|source| ContractError::ConfigParse {
            message: format!("{} parse error: {source}", self.name()),
            source: Some(source),
        })
    }

    /// Serialize a target list
    pub fn render(self, config: &NotifyConfig) -> Result<String, ContractError> {
        let rendered = match self {
            Self::Toml => toml::to_string_pretty(config).map_err(boxed),
            Self::Json => serde_json::to_string_pretty(config).map_err(boxed),
        };
        rendered.map_err(|source| {
            ContractError::config_parse(format!("{} serialize error: {source}", self.name()))
        })
    }
}

fn boxed<E>(e: E) -> Box<dyn std::error::Error + Send + Sync>
where
    E: std::error::Error + Send + Sync + 'static,
{
    Box::new(e)
}
