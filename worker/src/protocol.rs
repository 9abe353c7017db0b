//! Message protocol: the request envelope and typed responses.
//!
//! Requests stay loosely typed until the kind is known so an unrecognized
//! kind can be answered with an ERROR instead of being dropped at parse time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use simulation::{Bacterium, SimulationParameters, Statistics};

/// Request kinds understood by the worker.
pub const INITIALIZE: &str = "INITIALIZE";
pub const STEP: &str = "STEP";
pub const BATCH_STEP: &str = "BATCH_STEP";
pub const TERMINATE: &str = "TERMINATE";

/// Incoming request envelope: `{id, type, payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
        }
    }
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePayload {
    pub parameters: SimulationParameters,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub bacteria: Vec<Bacterium>,
    pub parameters: SimulationParameters,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStepPayload {
    pub bacteria: Vec<Bacterium>,
    pub parameters: SimulationParameters,
    pub steps: u32,
    #[serde(default = "default_report_progress")]
    pub report_progress: bool,
}

fn default_report_progress() -> bool {
    true
}

// ============================================================================
// Responses
// ============================================================================

/// Timing sample for one completed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub step_time_ms: f64,
    pub bacteria_count: usize,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Response payloads, serialized as `{type, payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ResponseBody {
    #[serde(rename = "WORKER_READY", rename_all = "camelCase")]
    WorkerReady { timestamp: i64 },
    #[serde(rename = "INITIALIZE_COMPLETE", rename_all = "camelCase")]
    InitializeComplete {
        bacteria: Vec<Bacterium>,
        statistics: Statistics,
    },
    #[serde(rename = "STEP_COMPLETE", rename_all = "camelCase")]
    StepComplete {
        bacteria: Vec<Bacterium>,
        statistics: Statistics,
    },
    #[serde(rename = "BATCH_STEP_PROGRESS", rename_all = "camelCase")]
    BatchStepProgress {
        current_step: u32,
        total_steps: u32,
        progress: f64,
        bacteria: Vec<Bacterium>,
        statistics: Statistics,
    },
    #[serde(rename = "BATCH_STEP_COMPLETE", rename_all = "camelCase")]
    BatchStepComplete {
        bacteria: Vec<Bacterium>,
        statistics: Statistics,
    },
    #[serde(rename = "TERMINATE_COMPLETE", rename_all = "camelCase")]
    TerminateComplete {
        performance_history: Vec<PerformanceRecord>,
    },
    #[serde(rename = "ERROR", rename_all = "camelCase")]
    Error { error: String },
}

/// Outgoing response envelope; echoes the request id when there is one.
/// Serializes to the same `{id, type, payload}` shape as requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl Response {
    pub fn to(id: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            id: Some(id.into()),
            body,
        }
    }

    /// For messages the caller never asked for, like WORKER_READY.
    pub fn unsolicited(body: ResponseBody) -> Self {
        Self { id: None, body }
    }
}

/// Failures surfaced to the caller as ERROR responses. Never fatal: the
/// worker keeps serving after reporting one.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("unknown request type: {0}")]
    UnknownType(String),
    #[error("malformed {kind} payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_roundtrip() {
        let json = r#"{"id":"req-1","type":"INITIALIZE","payload":{"parameters":{}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.id, "req-1");
        assert_eq!(envelope.kind, INITIALIZE);
    }

    #[test]
    fn test_envelope_payload_defaults_to_null() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"id":"t-1","type":"TERMINATE"}"#).unwrap();
        assert!(envelope.payload.is_null());
    }

    #[test]
    fn test_response_wire_shape() {
        let response = Response::to(
            "b-1",
            ResponseBody::BatchStepProgress {
                current_step: 5,
                total_steps: 25,
                progress: 0.2,
                bacteria: Vec::new(),
                statistics: Statistics::default(),
            },
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], "b-1");
        assert_eq!(value["type"], "BATCH_STEP_PROGRESS");
        assert_eq!(value["payload"]["currentStep"], 5);
        assert_eq!(value["payload"]["progress"], 0.2);
    }

    #[test]
    fn test_unsolicited_response_has_no_id() {
        let response = Response::unsolicited(ResponseBody::WorkerReady { timestamp: 123 });
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "WORKER_READY");
    }

    #[test]
    fn test_batch_payload_report_progress_default() {
        let payload: BatchStepPayload = serde_json::from_value(json!({
            "bacteria": [],
            "parameters": {
                "initialPopulation": 10,
                "petriDishSize": 300.0,
                "growthRate": 0.3,
                "antibioticConcentration": 0.0,
                "mutationRate": 0.02,
                "duration": 50
            },
            "steps": 25
        }))
        .unwrap();
        assert!(payload.report_progress);
    }
}
