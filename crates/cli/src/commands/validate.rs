//! `validate` command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::NotifyConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    target_count: usize,
    conditional_count: usize,
    disabled_count: usize,
    overlay_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            error: Some(CliError::config_not_found(config_path.clone()).to_string()),
            config_path,
            warnings: None,
            summary: None,
        };
    }

    match ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let condition_warnings = ConfigLoader::check_conditions(&config);
            let disabled_count = condition_warnings.len();

            let mut warnings: Vec<String> = condition_warnings
                .into_iter()
                .map(|w| {
                    format!(
                        "services[{}] '{}' will never be sent to: {}",
                        w.index, w.service, w.message
                    )
                })
                .collect();
            warnings.extend(collect_warnings(&config));

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    target_count: config.services.len(),
                    conditional_count: config
                        .services
                        .iter()
                        .filter(|t| t.has_conditions())
                        .count(),
                    disabled_count,
                    overlay_count: config.services.iter().filter(|t| t.data.is_some()).count(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &NotifyConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.services.is_empty() {
        warnings.push("No services configured - messages will be dropped".to_string());
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for target in &config.services {
        *seen.entry(target.service.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (service, count) in duplicates {
        warnings.push(format!(
            "Service '{service}' is listed {count} times and may receive duplicate notifications"
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Targets: {}", summary.target_count);
            println!("  With conditions: {}", summary.conditional_count);
            println!("  Disabled: {}", summary.disabled_count);
            println!("  With default data: {}", summary.overlay_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_invalid_condition_is_a_warning() {
        let file = write_config(
            r#"
[[services]]
service = "notify.a"
condition = true

[[services]]
service = "notify.b"
condition = { condition = "bogus" }
"#,
        );
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        });

        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.target_count, 2);
        assert_eq!(summary.disabled_count, 1);
        let warnings = result.warnings.unwrap();
        assert!(warnings[0].contains("notify.b"));
    }

    #[test]
    fn test_duplicate_services_warned() {
        let file = write_config(
            r#"
[[services]]
service = "notify.a"
condition = true

[[services]]
service = "notify.a"
condition = true
"#,
        );
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        });

        let warnings = result.warnings.unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("listed 2 times"));
    }

    #[test]
    fn test_empty_services_warned() {
        let file = write_config("services = []\n");
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        });

        assert!(result.valid);
        assert!(result.warnings.unwrap()[0].contains("No services"));
    }

    #[test]
    fn test_missing_file() {
        let result = validate_config(&ValidateArgs {
            config: "/nonexistent/notify.toml".into(),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_wrong_domain_is_invalid() {
        let file = write_config(
            r#"
[[services]]
service = "light.kitchen"
condition = true
"#,
        );
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        });
        assert!(!result.valid);
    }
}
