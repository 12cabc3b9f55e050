//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{NotifyConfig, NotifyTarget};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    targets: Vec<TargetInfo>,
}

#[derive(Serialize)]
struct TargetInfo {
    service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    condition_count: usize,
    status: TargetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    default_keys: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum TargetStatus {
    /// No conditions, always sent to
    Open,
    Conditional,
    /// Conditions failed to compile, never sent to
    Disabled,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &NotifyConfig) -> ConfigInfo {
    let disabled: Vec<usize> = ConfigLoader::check_conditions(config)
        .into_iter()
        .map(|w| w.index)
        .collect();

    let targets = config
        .services
        .iter()
        .enumerate()
        .map(|(index, target)| target_info(target, disabled.contains(&index)))
        .collect();

    ConfigInfo { targets }
}

fn target_info(target: &NotifyTarget, disabled: bool) -> TargetInfo {
    TargetInfo {
        service: target.service.clone(),
        service_name: target.service_name().map(str::to_string),
        condition_count: target.condition.len(),
        status: if disabled {
            TargetStatus::Disabled
        } else if target.has_conditions() {
            TargetStatus::Conditional
        } else {
            TargetStatus::Open
        },
        title: target.title.clone(),
        default_keys: target
            .data
            .as_ref()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("📣 Notify targets ({})", info.targets.len());

    for (i, target) in info.targets.iter().enumerate() {
        let is_last = i == info.targets.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let status = match target.status {
            TargetStatus::Open => " [always]",
            TargetStatus::Conditional => "",
            TargetStatus::Disabled => " [disabled]",
        };
        println!("   {} {}{}", prefix, target.service, status);
        println!(
            "   {}  ├─ Conditions: {}",
            child_prefix, target.condition_count
        );
        if let Some(ref title) = target.title {
            println!("   {}  ├─ Title: {}", child_prefix, title);
        }
        if target.default_keys.is_empty() {
            println!("   {}  └─ Default data: none", child_prefix);
        } else {
            println!(
                "   {}  └─ Default data: {}",
                child_prefix,
                target.default_keys.join(", ")
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::ConfigFormat;

    #[test]
    fn test_build_config_info() {
        let config = ConfigLoader::load_from_str(
            r#"
[[services]]
service = "notify.phone"
condition = [true, { condition = "state", path = "call.title", state = "Alarm" }]
title = "Alarm"

[services.data.data.push]
sound = "default"

[[services]]
service = "notify.tablet"
condition = { condition = "numeric", path = "call.level" }
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let info = build_config_info(&config);
        assert_eq!(info.targets.len(), 2);

        let phone = &info.targets[0];
        assert_eq!(phone.service_name.as_deref(), Some("phone"));
        assert_eq!(phone.condition_count, 2);
        assert_eq!(phone.status, TargetStatus::Conditional);
        assert_eq!(phone.default_keys, vec!["data".to_string()]);

        assert_eq!(info.targets[1].status, TargetStatus::Disabled);
    }

    #[test]
    fn test_target_without_conditions_is_open() {
        let target = NotifyTarget::new("notify.phone");
        assert_eq!(target_info(&target, false).status, TargetStatus::Open);
        assert_eq!(target_info(&target, true).status, TargetStatus::Disabled);

        let target = target.with_condition(serde_json::json!(true));
        assert_eq!(target_info(&target, false).status, TargetStatus::Conditional);
    }

    #[test]
    fn test_run_info_missing_config() {
        let args = InfoArgs {
            config: "/nonexistent/notify.toml".into(),
            json: false,
        };
        assert!(run_info(&args).is_err());
    }
}
