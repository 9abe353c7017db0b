//! End-to-end protocol tests: a spawned worker driven over its channels.

use std::time::Duration;

use serde_json::{json, Value};

use simulation::Dish;
use worker::{spawn, Envelope, ResponseBody, WorkerHandle, PERFORMANCE_HISTORY_CAPACITY};

const RECV_TIMEOUT: Duration = Duration::from_secs(30);

fn parameters(initial_population: u32, seed: u64) -> Value {
    json!({
        "initialPopulation": initial_population,
        "petriDishSize": 600.0,
        "growthRate": 0.3,
        "antibioticConcentration": 0.2,
        "mutationRate": 0.02,
        "duration": 100,
        "rngSeed": seed,
    })
}

/// Spawn a worker and consume the unsolicited WORKER_READY.
fn ready_worker() -> WorkerHandle {
    let handle = spawn();
    match handle.recv_timeout(RECV_TIMEOUT) {
        Some(response) => {
            assert!(response.id.is_none());
            assert!(matches!(response.body, ResponseBody::WorkerReady { .. }));
        }
        None => panic!("worker never became ready"),
    }
    handle
}

fn initialize(handle: &WorkerHandle, params: &Value) -> Vec<simulation::Bacterium> {
    handle.send(Envelope::new(
        "init",
        "INITIALIZE",
        json!({ "parameters": params }),
    ));
    match handle.recv_timeout(RECV_TIMEOUT) {
        Some(response) => {
            assert_eq!(response.id.as_deref(), Some("init"));
            match response.body {
                ResponseBody::InitializeComplete { bacteria, .. } => bacteria,
                other => panic!("expected INITIALIZE_COMPLETE, got {:?}", other),
            }
        }
        None => panic!("no response to INITIALIZE"),
    }
}

#[test]
fn test_initialize_scenario() {
    let handle = ready_worker();
    let bacteria = initialize(&handle, &parameters(1000, 101));

    assert_eq!(bacteria.len(), 1000);
    let dish = Dish::new(600.0);
    for b in &bacteria {
        assert!(dish.contains(b.x, b.y));
    }
    // Binomial(1000, 0.1), 3 sigma ~ +-29.
    let resistant = bacteria.iter().filter(|b| b.is_resistant).count();
    assert!((71..=129).contains(&resistant));

    handle.join();
}

#[test]
fn test_step_never_grows_without_reproduction() {
    let handle = ready_worker();
    let quiet = json!({
        "initialPopulation": 500,
        "petriDishSize": 600.0,
        "growthRate": 0.0,
        "antibioticConcentration": 0.0,
        "mutationRate": 0.0,
        "duration": 100,
        "rngSeed": 102,
    });
    let mut bacteria = initialize(&handle, &quiet);

    for i in 0..10 {
        let before = bacteria.len();
        handle.send(Envelope::new(
            format!("step-{}", i),
            "STEP",
            json!({ "bacteria": bacteria, "parameters": quiet }),
        ));
        match handle.recv_timeout(RECV_TIMEOUT).map(|r| r.body) {
            Some(ResponseBody::StepComplete {
                bacteria: next,
                statistics,
            }) => {
                assert!(next.len() <= before);
                assert_eq!(statistics.total_population, next.len());
                assert_eq!(
                    statistics.resistant_count + statistics.sensitive_count,
                    statistics.total_population
                );
                bacteria = next;
            }
            other => panic!("expected STEP_COMPLETE, got {:?}", other),
        }
    }

    handle.join();
}

#[test]
fn test_batch_progress_cadence() {
    let handle = ready_worker();
    let bacteria = initialize(&handle, &parameters(200, 103));

    handle.send(Envelope::new(
        "batch",
        "BATCH_STEP",
        json!({
            "bacteria": bacteria,
            "parameters": parameters(200, 103),
            "steps": 25,
            "reportProgress": true,
        }),
    ));

    let mut progress_steps = Vec::new();
    let mut completions = 0;
    loop {
        match handle.recv_timeout(RECV_TIMEOUT) {
            Some(response) => {
                assert_eq!(response.id.as_deref(), Some("batch"));
                match response.body {
                    ResponseBody::BatchStepProgress {
                        current_step,
                        total_steps,
                        progress,
                        ..
                    } => {
                        assert_eq!(total_steps, 25);
                        assert!((progress - f64::from(current_step) / 25.0).abs() < 1e-12);
                        progress_steps.push(current_step);
                    }
                    ResponseBody::BatchStepComplete { .. } => {
                        completions += 1;
                        break;
                    }
                    other => panic!("unexpected response: {:?}", other),
                }
            }
            None => panic!("batch never completed"),
        }
    }

    assert_eq!(progress_steps, vec![5, 10, 15, 20, 25]);
    assert_eq!(completions, 1);

    handle.join();
}

#[test]
fn test_terminate_mid_batch() {
    let handle = ready_worker();
    let bacteria = initialize(&handle, &parameters(400, 104));

    handle.send(Envelope::new(
        "batch",
        "BATCH_STEP",
        json!({
            "bacteria": bacteria,
            "parameters": parameters(400, 104),
            "steps": 500,
            "reportProgress": false,
        }),
    ));
    handle.send(Envelope::new("term", "TERMINATE", json!({})));

    // The interrupted batch still reports whatever generation it reached,
    // then the queued TERMINATE is answered.
    let mut saw_batch_complete = false;
    let mut history_len = None;
    while let Some(response) = handle.recv_timeout(RECV_TIMEOUT) {
        match response.body {
            ResponseBody::BatchStepComplete { .. } => {
                assert_eq!(response.id.as_deref(), Some("batch"));
                saw_batch_complete = true;
            }
            ResponseBody::TerminateComplete {
                performance_history,
            } => {
                assert_eq!(response.id.as_deref(), Some("term"));
                assert!(saw_batch_complete);
                history_len = Some(performance_history.len());
                break;
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
    assert!(history_len.unwrap() <= PERFORMANCE_HISTORY_CAPACITY);

    // The worker has shut down; the response channel is closed.
    assert!(handle.recv_timeout(Duration::from_secs(5)).is_none());
    handle.join();
}

#[test]
fn test_unknown_request_type() {
    let handle = ready_worker();

    handle.send(Envelope::new("mystery", "FROBNICATE", json!({})));
    match handle.recv_timeout(RECV_TIMEOUT) {
        Some(response) => {
            assert_eq!(response.id.as_deref(), Some("mystery"));
            match response.body {
                ResponseBody::Error { error } => assert!(error.contains("FROBNICATE")),
                other => panic!("expected ERROR, got {:?}", other),
            }
        }
        None => panic!("no response to unknown request"),
    }

    // Still responsive after the error.
    let bacteria = initialize(&handle, &parameters(10, 105));
    assert_eq!(bacteria.len(), 10);

    handle.join();
}

#[test]
fn test_malformed_payload_reports_error() {
    let handle = ready_worker();

    handle.send(Envelope::new(
        "bad",
        "STEP",
        json!({ "bacteria": "not-an-array" }),
    ));
    match handle.recv_timeout(RECV_TIMEOUT).map(|r| r.body) {
        Some(ResponseBody::Error { error }) => assert!(error.contains("STEP")),
        other => panic!("expected ERROR, got {:?}", other),
    }

    handle.join();
}
