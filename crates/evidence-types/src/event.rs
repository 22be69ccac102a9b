// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Kernel Event Types
// ─────────────────────────────────────────────────────────────────────
//! Labeled inbound and outbound events.
//!
//! Inbound rows carry a free-form label and an optional payload; the
//! label alone decides how the router treats the row. Payloads may be
//! inline JSON or a string holding JSON, as upstream event tables store
//! them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConfigSnapshot;
use crate::error::{AccumulationError, AccumulationResult};

pub const LABEL_READY: &str = "ready";
pub const LABEL_PROBA: &str = "predict_proba";
pub const LABEL_FEEDBACK: &str = "feedback";
pub const LABEL_PREDICT: &str = "predict";
pub const LABEL_ACCUMULATION: &str = "accumulation";

const RESET_PREFIX: &str = "reset_";
const QUERY_PREFIX: &str = "get_";
const CONTROL_SUFFIX: &str = "_accumulation";

/// Inbound row: `{timestamp, label, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Seconds; copied onto every event emitted while handling this row.
    #[serde(default)]
    pub timestamp: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// What an inbound label asks the router to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    ModelReady,
    Evidence,
    Reset { source: &'a str },
    Query { source: &'a str },
    Unknown,
}

impl InboundEvent {
    pub fn new(timestamp: f64, label: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            timestamp,
            label: label.into(),
            data,
        }
    }

    pub fn ready(timestamp: f64) -> Self {
        Self::new(timestamp, LABEL_READY, None)
    }

    /// Evidence row wrapped the way upstream classifiers send it.
    pub fn evidence(timestamp: f64, proba: &[f64]) -> Self {
        Self::new(
            timestamp,
            LABEL_PROBA,
            Some(serde_json::json!({ "result": proba })),
        )
    }

    pub fn reset(timestamp: f64, source: &str, settings: Value) -> Self {
        Self::new(
            timestamp,
            format!("{RESET_PREFIX}{source}{CONTROL_SUFFIX}"),
            Some(settings),
        )
    }

    pub fn query(timestamp: f64, source: &str) -> Self {
        Self::new(timestamp, format!("{QUERY_PREFIX}{source}{CONTROL_SUFFIX}"), None)
    }

    /// Classify the row by its label.
    pub fn kind(&self) -> EventKind<'_> {
        let label = self.label.as_str();
        match label {
            LABEL_READY => return EventKind::ModelReady,
            LABEL_PROBA => return EventKind::Evidence,
            _ => {}
        }
        if let Some(source) = control_source(label, RESET_PREFIX) {
            return EventKind::Reset { source };
        }
        if let Some(source) = control_source(label, QUERY_PREFIX) {
            return EventKind::Query { source };
        }
        EventKind::Unknown
    }

    /// Payload with string-encoded JSON unwrapped. `Null` when absent.
    pub fn payload(&self) -> AccumulationResult<Value> {
        match &self.data {
            None => Ok(Value::Null),
            Some(Value::String(raw)) => serde_json::from_str(raw)
                .map_err(|e| AccumulationError::Decode(format!("'{}' payload: {e}", self.label))),
            Some(other) => Ok(other.clone()),
        }
    }

    /// Decode an evidence payload: `[p0, p1, ...]` or `{"result": [...]}`.
    pub fn probabilities(&self) -> AccumulationResult<Vec<f64>> {
        let payload = self.payload()?;
        let values = match payload {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut map) => map.remove("result").ok_or_else(|| {
                AccumulationError::Decode("evidence object has no 'result' key".to_string())
            })?,
            other => {
                return Err(AccumulationError::Decode(format!(
                    "evidence payload must be an array, got {other}"
                )))
            }
        };
        serde_json::from_value(values)
            .map_err(|e| AccumulationError::Decode(format!("evidence vector: {e}")))
    }
}

fn control_source<'a>(label: &'a str, prefix: &str) -> Option<&'a str> {
    label.strip_prefix(prefix)?.strip_suffix(CONTROL_SUFFIX)
}

/// Running-score payload of a `feedback` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub scores: Vec<f64>,
    pub source: String,
}

/// A confident decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub target: usize,
    pub scores: Vec<f64>,
    /// Evidence vectors folded in since the last reset.
    #[serde(rename = "accumulation")]
    pub accumulation_depth: usize,
    pub source: String,
}

/// Outbound event body, tagged by label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "label", content = "data", rename_all = "snake_case")]
pub enum Outbound {
    Ready,
    Feedback(Feedback),
    Predict(Decision),
    Accumulation(ConfigSnapshot),
}

impl Outbound {
    pub fn label(&self) -> &'static str {
        match self {
            Outbound::Ready => LABEL_READY,
            Outbound::Feedback(_) => LABEL_FEEDBACK,
            Outbound::Predict(_) => LABEL_PREDICT,
            Outbound::Accumulation(_) => LABEL_ACCUMULATION,
        }
    }
}

/// Outbound row: `{timestamp, label, data}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEvent {
    pub timestamp: f64,
    #[serde(flatten)]
    pub body: Outbound,
}

impl OutboundEvent {
    pub fn new(timestamp: f64, body: Outbound) -> Self {
        Self { timestamp, body }
    }

    pub fn label(&self) -> &'static str {
        self.body.label()
    }

    pub fn decision(&self) -> Option<&Decision> {
        match &self.body {
            Outbound::Predict(decision) => Some(decision),
            _ => None,
        }
    }
}
