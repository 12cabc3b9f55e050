//! ConditionalNotifier - conditional fan-out to notify services

use std::sync::Arc;

use conditions::ConditionChecker;
use contracts::{EvaluationContext, NotifyTarget, Payload, ServiceDispatcher, NOTIFY_DOMAIN};
use futures::future::join_all;
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatcherError;
use crate::merge::{add_defaults, base_payload};
use crate::metrics::{MetricsSnapshot, NotifierMetrics};

/// How a target is gated
#[derive(Debug)]
enum Gate {
    /// No conditions declared
    Open,
    /// Compiled conditions, evaluated per invocation
    Conditions(ConditionChecker),
    /// Invalid configuration, never sent to
    Closed,
}

/// A target with its conditions compiled
#[derive(Debug)]
struct CompiledTarget {
    config: NotifyTarget,
    gate: Gate,
}

impl CompiledTarget {
    fn compile(config: NotifyTarget) -> Self {
        if config.service_name().is_none() {
            warn!(
                target_service = %config.service,
                "Invalid service identifier, target disabled"
            );
            observability::metrics::record_invalid_target(&config.service);
            return Self {
                config,
                gate: Gate::Closed,
            };
        }

        if !config.has_conditions() {
            return Self {
                config,
                gate: Gate::Open,
            };
        }

        let gate = match ConditionChecker::compile(&config.service, &config.condition) {
            Ok(checker) => Gate::Conditions(checker),
            Err(e) => {
                warn!(
                    target_service = %config.service,
                    error = %e,
                    "Invalid condition, target disabled"
                );
                observability::metrics::record_invalid_target(&config.service);
                Gate::Closed
            }
        };
        Self { config, gate }
    }

    fn admits(&self) -> bool {
        match &self.gate {
            Gate::Open => true,
            Gate::Closed => false,
            Gate::Conditions(checker) => checker
                .evaluate(&EvaluationContext::for_target(&self.config))
                .qualifies(),
        }
    }
}

/// Summary of one `send_message` invocation
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Targets considered
    pub evaluated: usize,
    /// Targets skipped by conditions or invalid configuration
    pub excluded: usize,
    /// Sends submitted
    pub issued: usize,
    /// Submitted sends that failed
    pub failures: Vec<DispatcherError>,
}

impl DispatchReport {
    /// Submitted sends that completed successfully
    pub fn succeeded(&self) -> usize {
        self.issued - self.failures.len()
    }
}

/// Fans one message out to every qualifying target
///
/// The target list is fixed at construction. Conditions are compiled once;
/// a target whose conditions fail to compile is kept but never sent to.
pub struct ConditionalNotifier<D> {
    targets: Vec<CompiledTarget>,
    dispatcher: Arc<D>,
    metrics: Arc<NotifierMetrics>,
}

impl<D> ConditionalNotifier<D>
where
    D: ServiceDispatcher + Sync + 'static,
{
    /// Create a notifier owning its dispatcher
    pub fn new(targets: Vec<NotifyTarget>, dispatcher: D) -> Self {
        Self::with_shared(targets, Arc::new(dispatcher))
    }

    /// Create a notifier sharing a dispatcher with the caller
    #[instrument(name = "notifier_new", skip_all, fields(target_count = targets.len()))]
    pub fn with_shared(targets: Vec<NotifyTarget>, dispatcher: Arc<D>) -> Self {
        let targets: Vec<_> = targets.into_iter().map(CompiledTarget::compile).collect();
        let disabled = targets
            .iter()
            .filter(|t| matches!(t.gate, Gate::Closed))
            .count();

        info!(
            targets = targets.len(),
            disabled, "Conditional notifier initialized"
        );

        Self {
            targets,
            dispatcher,
            metrics: Arc::new(NotifierMetrics::new()),
        }
    }

    /// Configured targets, in order
    pub fn targets(&self) -> impl Iterator<Item = &NotifyTarget> {
        self.targets.iter().map(|t| &t.config)
    }

    /// Number of targets that can never be sent to
    pub fn disabled_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t.gate, Gate::Closed))
            .count()
    }

    /// Counters accumulated across invocations
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Send `message` to every qualifying target
    ///
    /// Attributes with falsy values are dropped. All sends are submitted
    /// before any is awaited; the call returns once every send has settled.
    /// Individual failures are logged and reported, never returned as errors.
    #[instrument(
        name = "notifier_send_message",
        skip(self, message, attributes),
        fields(targets = self.targets.len())
    )]
    pub async fn send_message(&self, message: &str, attributes: Payload) -> DispatchReport {
        let payload = base_payload(message, attributes);
        let mut report = DispatchReport::default();
        let mut pending = Vec::new();

        for target in &self.targets {
            report.evaluated += 1;

            if !target.admits() {
                report.excluded += 1;
                self.metrics.inc_excluded_count();
                observability::metrics::record_target_excluded(&target.config.service);
                debug!(target_service = %target.config.service, "Target excluded");
                continue;
            }

            let Some(service) = target.config.service_name() else {
                continue;
            };

            let mut sending = payload.clone();
            if let Some(defaults) = &target.config.data {
                add_defaults(&mut sending, defaults);
            }

            let service = service.to_string();
            let dispatcher = Arc::clone(&self.dispatcher);
            let task_service = service.clone();
            let handle = tokio::spawn(async move {
                dispatcher
                    .call(NOTIFY_DOMAIN, &task_service, sending)
                    .await
            });

            debug!(service = %service, "Send submitted");
            pending.push((service, handle));
            report.issued += 1;
        }

        if pending.is_empty() {
            return report;
        }

        let (services, handles): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
        let results = join_all(handles).await;

        for (service, result) in services.into_iter().zip(results) {
            let failure = match result {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(DispatcherError::send(&service, e)),
                Err(e) => {
                    error!(service = %service, error = %e, "Send task panicked");
                    Some(DispatcherError::task_failed(&service, e.to_string()))
                }
            };

            match failure {
                None => {
                    self.metrics.inc_sent_count();
                    observability::metrics::record_send(&service, true);
                }
                Some(failure) => {
                    warn!(service = %service, error = %failure, "Send failed");
                    self.metrics.inc_failure_count();
                    observability::metrics::record_send(&service, false);
                    report.failures.push(failure);
                }
            }
        }

        debug!(
            issued = report.issued,
            failed = report.failures.len(),
            excluded = report.excluded,
            "All sends settled"
        );
        report
    }
}
