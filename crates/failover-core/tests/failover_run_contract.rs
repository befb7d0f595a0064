//! Contract Test: One-shot Failover Run
//!
//! This test drives the FailoverEngine end to end with test doubles.
//!
//! Constraints verified:
//! - Configuration order is priority order; first success wins
//! - No endpoint after the selected one is probed
//! - An empty or all-failing instance list is fatal and touches no provider
//! - The selected instance's address is what the record ends up pointing at
//! - Engine events describe the run in order
//! - A delete that went out is reported even when the add fails

mod common;

use common::*;
use failover_core::{DeleteStatus, EngineEvent, Error, FailoverEngine, HealthOutcome};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn second_instance_selected_when_first_returns_500() {
    let probe = ScriptedProbe::new(&[
        ("http://a:80", HealthOutcome::Responded { status: 500 }),
        ("http://b:80", HealthOutcome::Reachable { status: 200 }),
    ]);
    let probed = probe.probed();
    let resolver = StaticResolver::new(&[
        ("a", vec![ip("10.0.0.1")]),
        ("b", vec![ip("10.0.0.2")]),
    ]);
    let provider = RecordingProvider::new();
    let calls = provider.calls();

    let (engine, _events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(resolver),
        Box::new(provider),
        minimal_config("ollama.lan", &["http://a:80", "http://b:80"]),
    )
    .expect("engine construction succeeds");

    let report = assert_ok!(engine.run_once().await);

    assert_eq!(report.selected, "http://b:80");
    assert_eq!(report.replacement.ip, ip("10.0.0.2"));
    assert_eq!(*probed.lock().unwrap(), vec!["http://a:80", "http://b:80"]);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ProviderCall::Delete {
                record_name: "ollama.lan".to_string(),
                ip: ip("10.0.0.2"),
            },
            ProviderCall::Add {
                record_name: "ollama.lan".to_string(),
                ip: ip("10.0.0.2"),
            },
        ]
    );
}

#[tokio::test]
async fn nothing_after_the_selected_instance_is_probed() {
    // First K unreachable, K+1 healthy, the rest never touched
    let probe = ScriptedProbe::new(&[
        ("http://10.0.0.1", HealthOutcome::Failed { error: "refused".into() }),
        ("http://10.0.0.2", HealthOutcome::Failed { error: "timeout".into() }),
        ("http://10.0.0.3", HealthOutcome::Responded { status: 404 }),
        ("http://10.0.0.4", HealthOutcome::Reachable { status: 200 }),
        ("http://10.0.0.5", HealthOutcome::Reachable { status: 200 }),
    ]);
    let probed = probe.probed();

    let (engine, _events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(StaticResolver::new(&[])),
        Box::new(RecordingProvider::new()),
        minimal_config(
            "ollama.lan",
            &[
                "http://10.0.0.1",
                "http://10.0.0.2",
                "http://10.0.0.3",
                "http://10.0.0.4",
                "http://10.0.0.5",
            ],
        ),
    )
    .expect("engine construction succeeds");

    let report = assert_ok!(engine.run_once().await);

    assert_eq!(report.selected, "http://10.0.0.4");
    assert_eq!(probed.lock().unwrap().len(), 4);
    assert!(!probed.lock().unwrap().contains(&"http://10.0.0.5".to_string()));
}

#[tokio::test]
async fn empty_instance_list_is_fatal_without_provider_requests() {
    let probe = ScriptedProbe::new(&[]);
    let probed = probe.probed();
    let provider = RecordingProvider::new();
    let calls = provider.calls();

    let (engine, _events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(StaticResolver::new(&[])),
        Box::new(provider),
        minimal_config("ollama.lan", &[]),
    )
    .expect("empty instance list is valid configuration");

    let err = assert_err!(engine.run_once().await);

    assert!(matches!(err, Error::NoAvailableInstance), "got {:?}", err);
    assert!(probed.lock().unwrap().is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn all_instances_failing_is_fatal_without_provider_requests() {
    let probe = ScriptedProbe::new(&[
        ("http://a:80", HealthOutcome::Responded { status: 502 }),
        ("http://b:80", HealthOutcome::Failed { error: "refused".into() }),
    ]);
    let provider = RecordingProvider::new();
    let calls = provider.calls();

    let (engine, _events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(StaticResolver::new(&[])),
        Box::new(provider),
        minimal_config("ollama.lan", &["http://a:80", "http://b:80"]),
    )
    .expect("engine construction succeeds");

    let err = assert_err!(engine.run_once().await);

    assert!(matches!(err, Error::NoAvailableInstance), "got {:?}", err);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_failure_fails_the_run() {
    let probe = ScriptedProbe::new(&[("http://10.0.0.9", HealthOutcome::Reachable { status: 200 })]);

    let (engine, mut events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(StaticResolver::new(&[])),
        Box::new(RecordingProvider::new().failing_add()),
        minimal_config("ollama.lan", &["http://10.0.0.9"]),
    )
    .expect("engine construction succeeds");

    let err = assert_err!(engine.run_once().await);
    assert!(matches!(err, Error::CreateRequest(_)), "got {:?}", err);

    let mut last = None;
    while let Ok(event) = events.try_recv() {
        last = Some(event);
    }
    assert!(matches!(last, Some(EngineEvent::RunFailed { .. })));
}

#[tokio::test]
async fn delete_is_reported_before_create_failure() {
    // The record is gone once the delete went out, even if the add fails
    let probe = ScriptedProbe::new(&[("http://10.0.0.9", HealthOutcome::Reachable { status: 200 })]);
    let provider = RecordingProvider::new().failing_add();
    let calls = provider.calls();

    let (engine, mut events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(StaticResolver::new(&[])),
        Box::new(provider),
        minimal_config("ollama.lan", &["http://10.0.0.9"]),
    )
    .expect("engine construction succeeds");

    assert_err!(engine.run_once().await);
    assert_eq!(calls.lock().unwrap().len(), 2);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    let deleted = received
        .iter()
        .position(|e| {
            *e == EngineEvent::RecordDeleted {
                record_name: "ollama.lan".to_string(),
                ip: ip("10.0.0.9"),
                outcome: DeleteStatus::Removed,
            }
        })
        .expect("delete outcome is reported");
    let failed = received
        .iter()
        .position(|e| matches!(e, EngineEvent::RunFailed { .. }))
        .expect("run failure is reported");

    assert!(deleted < failed, "events: {:?}", received);
    assert!(
        !received
            .iter()
            .any(|e| matches!(e, EngineEvent::RecordCreated { .. }))
    );
}

#[tokio::test]
async fn events_describe_the_run_in_order() {
    let probe = ScriptedProbe::new(&[
        ("http://a:80", HealthOutcome::Responded { status: 500 }),
        ("http://b:80", HealthOutcome::Reachable { status: 200 }),
    ]);
    let resolver = StaticResolver::new(&[("b", vec![ip("10.0.0.2")])]);

    let (engine, mut events) = FailoverEngine::new(
        Box::new(probe),
        Box::new(resolver),
        Box::new(RecordingProvider::new().with_delete(DeleteBehavior::NotFound)),
        minimal_config("ollama.lan", &["http://a:80", "http://b:80"]),
    )
    .expect("engine construction succeeds");

    assert_ok!(engine.run_once().await);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            EngineEvent::Started { instances_count: 2 },
            EngineEvent::ProbeFailed {
                endpoint: "http://a:80".to_string(),
                reason: "Probe of http://a:80 returned status 500".to_string(),
            },
            EngineEvent::ProbeSucceeded {
                endpoint: "http://b:80".to_string(),
            },
            EngineEvent::InstanceSelected {
                endpoint: "http://b:80".to_string(),
            },
            EngineEvent::RecordDeleted {
                record_name: "ollama.lan".to_string(),
                ip: ip("10.0.0.2"),
                outcome: DeleteStatus::NotFound,
            },
            EngineEvent::RecordCreated {
                record_name: "ollama.lan".to_string(),
                ip: ip("10.0.0.2"),
            },
        ]
    );
}

#[tokio::test]
async fn invalid_config_is_rejected_at_construction() {
    let result = FailoverEngine::new(
        Box::new(ScriptedProbe::new(&[])),
        Box::new(StaticResolver::new(&[])),
        Box::new(RecordingProvider::new()),
        minimal_config("", &["http://a:80"]),
    );

    assert!(matches!(result, Err(Error::Config(_))));
}
