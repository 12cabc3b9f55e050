//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Contract smoke tests
//! - Config file to dispatched payload, through a recording dispatcher
//! - Fan-out behavior with custom `ServiceDispatcher` implementations

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        assert_eq!(contracts::NOTIFY_DOMAIN, "notify");
        assert_eq!(contracts::FORWARDED_ATTRIBUTES.len(), 4);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, NotifyTarget, Payload, ServiceDispatcher};
    use dispatcher::{ConditionalNotifier, MemoryDispatcher};
    use serde_json::{json, Value};

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn notifier_from_toml(
        content: &str,
        dispatcher: MemoryDispatcher,
    ) -> (ConditionalNotifier<MemoryDispatcher>, Arc<MemoryDispatcher>) {
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let dispatcher = Arc::new(dispatcher);
        (
            ConditionalNotifier::with_shared(config.services, Arc::clone(&dispatcher)),
            dispatcher,
        )
    }

    /// End-to-end test: literal conditions gate the fan-out
    #[tokio::test]
    async fn test_e2e_literal_conditions() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = [true]

[[services]]
service = "notify.b"
condition = [false]
"#,
            MemoryDispatcher::new(),
        );

        let report = notifier.send_message("Hello", Payload::new()).await;

        assert_eq!(report.issued, 1);
        assert_eq!(report.excluded, 1);
        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].domain, "notify");
        assert_eq!(calls[0].service, "a");
        assert_eq!(calls[0].payload, payload(json!({"message": "Hello"})));
    }

    /// End-to-end test: target defaults fill an absent `data` attribute
    #[tokio::test]
    async fn test_e2e_default_data() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.phone"
condition = true

[services.data.data.push]
sound = "default"
"#,
            MemoryDispatcher::new(),
        );

        notifier.send_message("Door open", Payload::new()).await;

        let calls = dispatcher.calls_to("phone");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].payload["data"], json!({"push": {"sound": "default"}}));
    }

    /// End-to-end test: invocation data wins, sibling defaults survive
    #[tokio::test]
    async fn test_e2e_invocation_data_wins() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.phone"
condition = true

[services.data.data.push]
sound = "default"
badge = 1
"#,
            MemoryDispatcher::new(),
        );

        let attributes = payload(json!({"data": {"push": {"sound": "loud"}}}));
        notifier.send_message("Alarm", attributes).await;

        let calls = dispatcher.calls();
        assert_eq!(calls[0].payload["data"], json!({"push": {"sound": "loud", "badge": 1}}));
    }

    /// End-to-end test: zero targets completes without sends
    #[tokio::test]
    async fn test_e2e_zero_targets() {
        let (notifier, dispatcher) = notifier_from_toml("services = []", MemoryDispatcher::new());

        let report = notifier.send_message("Hello", Payload::new()).await;

        assert_eq!(report.evaluated, 0);
        assert_eq!(report.issued, 0);
        assert!(report.failures.is_empty());
        assert!(dispatcher.calls().is_empty());
    }

    /// Overlay of one target never leaks into another target's payload
    #[tokio::test]
    async fn test_e2e_overlays_are_isolated() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = true
data = { data = { x = 1 } }

[[services]]
service = "notify.b"
condition = true
"#,
            MemoryDispatcher::new(),
        );

        let attributes = payload(json!({"data": {"y": 2}}));
        notifier.send_message("Hello", attributes).await;

        let a = dispatcher.calls_to("a");
        let b = dispatcher.calls_to("b");
        assert_eq!(a[0].payload["data"], json!({"x": 1, "y": 2}));
        assert_eq!(b[0].payload["data"], json!({"y": 2}));
    }

    /// Falsy attributes never reach any target
    #[tokio::test]
    async fn test_e2e_falsy_attributes_dropped() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = [true]
"#,
            MemoryDispatcher::new(),
        );

        let attributes = payload(json!({"title": "", "priority": 0, "data": {}, "target": "me"}));
        notifier.send_message("Hello", attributes).await;

        let calls = dispatcher.calls();
        assert_eq!(
            calls[0].payload,
            payload(json!({"message": "Hello", "target": "me"}))
        );
    }

    /// Conditions see the target's forwarded attributes under `call`
    #[tokio::test]
    async fn test_e2e_conditions_over_target_attributes() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.alarm_panel"
title = "Alarm"
condition = [
    { condition = "state", path = "call.title", state = ["Alarm", "Alert"] },
    { condition = "match", path = "entity.service", pattern = "^notify\\.alarm_" },
]

[[services]]
service = "notify.tablet"
title = "Info"
condition = { condition = "state", path = "call.title", state = "Alarm" }
"#,
            MemoryDispatcher::new(),
        );

        let report = notifier.send_message("Intrusion", Payload::new()).await;

        assert_eq!(report.issued, 1);
        assert_eq!(dispatcher.calls()[0].service, "alarm_panel");
    }

    /// A condition that errors with no explicit false excludes the target
    #[tokio::test]
    async fn test_e2e_erroring_condition_excludes() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = [true, { condition = "state", path = "call.missing", state = "x" }]

[[services]]
service = "notify.b"
condition = true
"#,
            MemoryDispatcher::new(),
        );

        let report = notifier.send_message("Hello", Payload::new()).await;

        assert_eq!(report.excluded, 1);
        assert_eq!(dispatcher.calls().len(), 1);
        assert_eq!(dispatcher.calls()[0].service, "b");
    }

    /// An invalid condition disables its target on every invocation
    #[tokio::test]
    async fn test_e2e_invalid_condition_disables_target() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = { condition = "numeric", path = "call.level" }

[[services]]
service = "notify.b"
condition = { condition = "numeric", path = "call.level", above = 5, enabled = false }
"#,
            MemoryDispatcher::new(),
        );

        assert_eq!(notifier.disabled_count(), 1);
        for _ in 0..3 {
            notifier.send_message("Hello", Payload::new()).await;
        }

        assert!(dispatcher.calls_to("a").is_empty());
        assert_eq!(dispatcher.calls_to("b").len(), 3);
        assert_eq!(notifier.metrics().excluded_count, 3);
    }

    /// Failed sends are reported, the rest still complete
    #[tokio::test]
    async fn test_e2e_failure_isolation() {
        let (notifier, dispatcher) = notifier_from_toml(
            r#"
[[services]]
service = "notify.a"
condition = true

[[services]]
service = "notify.b"
condition = true

[[services]]
service = "notify.c"
condition = true
"#,
            MemoryDispatcher::new()
                .with_failing("b")
                .with_delay(Duration::from_millis(10)),
        );

        let report = notifier.send_message("Hello", Payload::new()).await;

        assert_eq!(report.issued, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].service(), "b");
        assert_eq!(dispatcher.calls().len(), 2);
    }

    /// Dispatcher counting concurrent calls in flight
    #[derive(Default)]
    struct ConcurrencyProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ServiceDispatcher for ConcurrencyProbe {
        async fn call(
            &self,
            _domain: &str,
            _service: &str,
            _payload: Payload,
        ) -> Result<(), ContractError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// All sends are submitted before any is awaited
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_sends_run_concurrently() {
        let targets = (0..4)
            .map(|i| NotifyTarget::new(format!("notify.t{i}")).with_condition(json!(true)))
            .collect();
        let probe = Arc::new(ConcurrencyProbe::default());
        let notifier = ConditionalNotifier::with_shared(targets, Arc::clone(&probe));

        let report = notifier.send_message("Hello", Payload::new()).await;

        assert_eq!(report.succeeded(), 4);
        assert_eq!(probe.in_flight.load(Ordering::SeqCst), 0);
        assert!(probe.peak.load(Ordering::SeqCst) > 1);
    }
}
