//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate the target list
//! - Report condition grammar problems as warnings
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("notify.toml")).unwrap();
//! println!("Targets: {}", config.services.len());
//! ```

mod parser;
mod validator;

pub use contracts::NotifyConfig;
pub use parser::ConfigFormat;

use conditions::ConditionChecker;
use contracts::ContractError;
use std::path::Path;

/// Non-fatal problem found in a target's conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionWarning {
    /// Position of the target in `services`
    pub index: usize,
    /// Service identifier of the target
    pub service: String,
    /// Compile error message
    pub message: String,
}

/// Loads, validates and renders the target list
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the target list from a `.toml` or `.json` file
    ///
    /// Errors name the offending file.
    pub fn load_from_path(path: &Path) -> Result<NotifyConfig, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("{}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        Self::load_from_str(&content, format).map_err(|e| match e {
            ContractError::ConfigParse { message, source } => ContractError::ConfigParse {
                message: format!("{}: {message}", path.display()),
                source,
            },
            ContractError::ConfigValidation { field, message } => {
                ContractError::config_validation(field, format!("{message} (in {})", path.display()))
            }
            other => other,
        })
    }

    /// Parse then validate an in-memory document
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<NotifyConfig, ContractError> {
        let config = format.parse(content)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Compile every target's conditions and collect the failures
    ///
    /// Targets listed here will be disabled by the notifier.
    pub fn check_conditions(config: &NotifyConfig) -> Vec<ConditionWarning> {
        config
            .services
            .iter()
            .enumerate()
            .filter_map(|(index, target)| {
                ConditionChecker::compile(&target.service, &target.condition)
                    .err()
                    .map(|e| ConditionWarning {
                        index,
                        service: target.service.clone(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    pub fn to_toml(config: &NotifyConfig) -> Result<String, ContractError> {
        ConfigFormat::Toml.render(config)
    }

    pub fn to_json(config: &NotifyConfig) -> Result<String, ContractError> {
        ConfigFormat::Json.render(config)
    }
}
