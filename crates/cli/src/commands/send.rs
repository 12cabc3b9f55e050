//! `send` command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::{NotifyConfig, Payload, ATTR_DATA, ATTR_TARGET, ATTR_TITLE};
use dispatcher::{ConditionalNotifier, DispatchReport, LogDispatcher, MemoryDispatcher, ServiceCall};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cli::SendArgs;
use crate::error::{self, CliError};

/// Dispatch summary for output
#[derive(Serialize)]
struct SendSummary {
    evaluated: usize,
    excluded: usize,
    issued: usize,
    succeeded: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calls: Option<Vec<CallInfo>>,
}

#[derive(Serialize)]
struct CallInfo {
    service: String,
    payload: Payload,
}

impl SendSummary {
    fn new(report: &DispatchReport, calls: Option<Vec<ServiceCall>>) -> Self {
        Self {
            evaluated: report.evaluated,
            excluded: report.excluded,
            issued: report.issued,
            succeeded: report.succeeded(),
            failures: report.failures.iter().map(|f| f.to_string()).collect(),
            calls: calls.map(|calls| {
                calls
                    .into_iter()
                    .map(|call| CallInfo {
                        service: format!("{}.{}", call.domain, call.service),
                        payload: call.payload,
                    })
                    .collect()
            }),
        }
    }
}

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let attributes = build_attributes(args)?;

    info!(
        targets = config.services.len(),
        dry_run = args.dry_run,
        "Sending message"
    );

    let summary = if args.dry_run {
        let dispatcher = Arc::new(MemoryDispatcher::new());
        let notifier = ConditionalNotifier::with_shared(config.services, Arc::clone(&dispatcher));
        let report = notifier.send_message(&args.message, attributes).await;
        SendSummary::new(&report, Some(dispatcher.calls()))
    } else {
        let notifier = ConditionalNotifier::new(config.services, LogDispatcher::new());
        let report = notifier.send_message(&args.message, attributes).await;
        SendSummary::new(&report, None)
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize send summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<NotifyConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Collect invocation attributes from the command line
fn build_attributes(args: &SendArgs) -> error::Result<Payload> {
    let mut attributes = Payload::new();

    if let Some(title) = &args.title {
        attributes.insert(ATTR_TITLE.to_string(), Value::String(title.clone()));
    }

    match args.targets.as_slice() {
        [] => {}
        [single] => {
            attributes.insert(ATTR_TARGET.to_string(), Value::String(single.clone()));
        }
        many => {
            let list = many.iter().cloned().map(Value::String).collect();
            attributes.insert(ATTR_TARGET.to_string(), Value::Array(list));
        }
    }

    if let Some(raw) = &args.data {
        let data: Value = serde_json::from_str(raw)
            .map_err(|e| CliError::invalid_argument("--data", e.to_string()))?;
        if !data.is_object() {
            return Err(CliError::invalid_argument("--data", "expected a JSON object"));
        }
        attributes.insert(ATTR_DATA.to_string(), data);
    }

    for attr in &args.attrs {
        let (key, raw) = attr
            .split_once('=')
            .ok_or_else(|| CliError::invalid_argument("--attr", format!("'{attr}' is not KEY=VALUE")))?;
        if key.is_empty() {
            return Err(CliError::invalid_argument("--attr", "empty key"));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        attributes.insert(key.to_string(), value);
    }

    Ok(attributes)
}

fn print_summary(summary: &SendSummary) {
    println!(
        "Sent to {}/{} targets ({} excluded, {} failed)",
        summary.succeeded,
        summary.evaluated,
        summary.excluded,
        summary.failures.len()
    );

    for failure in &summary.failures {
        println!("  ✗ {}", failure);
    }

    if let Some(ref calls) = summary.calls {
        for call in calls {
            let payload = serde_json::to_string(&call.payload).unwrap_or_default();
            println!("  → {}: {}", call.service, payload);
        }
    }
}
