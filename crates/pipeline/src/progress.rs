//! Lifecycle events emitted at stage boundaries, delivered to a sink.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A discrete lifecycle event. Flat records, each carrying a timestamp;
/// delivery order matches the orchestrator's stage order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    WorkflowStarted {
        timestamp: DateTime<Utc>,
    },
    StepStarted {
        timestamp: DateTime<Utc>,
        name: String,
        index: usize,
    },
    StepCompleted {
        timestamp: DateTime<Utc>,
        name: String,
        artifacts: Vec<String>,
    },
    Checkpoint {
        timestamp: DateTime<Utc>,
        message: String,
        needs_approval: bool,
    },
    StepFailed {
        timestamp: DateTime<Utc>,
        name: String,
        error: String,
        recoverable: bool,
    },
    WorkflowCompleted {
        timestamp: DateTime<Utc>,
        output: String,
        elapsed_secs: f64,
    },
}

impl ProgressEvent {
    pub fn workflow_started() -> Self {
        Self::WorkflowStarted { timestamp: Utc::now() }
    }

    pub fn step_started(name: impl Into<String>, index: usize) -> Self {
        Self::StepStarted {
            timestamp: Utc::now(),
            name: name.into(),
            index,
        }
    }

    pub fn step_completed(name: impl Into<String>, artifacts: Vec<String>) -> Self {
        Self::StepCompleted {
            timestamp: Utc::now(),
            name: name.into(),
            artifacts,
        }
    }

    pub fn checkpoint(message: impl Into<String>, needs_approval: bool) -> Self {
        Self::Checkpoint {
            timestamp: Utc::now(),
            message: message.into(),
            needs_approval,
        }
    }

    pub fn step_failed(name: impl Into<String>, error: impl Into<String>, recoverable: bool) -> Self {
        Self::StepFailed {
            timestamp: Utc::now(),
            name: name.into(),
            error: error.into(),
            recoverable,
        }
    }

    pub fn workflow_completed(output: impl Into<String>, elapsed_secs: f64) -> Self {
        Self::WorkflowCompleted {
            timestamp: Utc::now(),
            output: output.into(),
            elapsed_secs,
        }
    }
}

/// Receiver for progress events.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Sink that routes events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::WorkflowStarted { .. } => log::info!("Workflow started"),
            ProgressEvent::StepStarted { name, index, .. } => {
                log::info!("Step {} started: {}", index, name)
            }
            ProgressEvent::StepCompleted { name, artifacts, .. } => {
                log::info!("Step completed: {} ({})", name, artifacts.join(", "))
            }
            ProgressEvent::Checkpoint { message, .. } => log::info!("Checkpoint: {}", message),
            ProgressEvent::StepFailed { name, error, recoverable, .. } => {
                log::warn!(
                    "Step failed: {} ({}, recoverable: {})",
                    name,
                    error,
                    recoverable
                )
            }
            ProgressEvent::WorkflowCompleted { output, elapsed_secs, .. } => {
                log::info!("Workflow completed: {} in {:.2}s", output, elapsed_secs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_flat() {
        let event = ProgressEvent::step_started("parse", 0);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "step_started");
        assert_eq!(json["name"], "parse");
        assert_eq!(json["index"], 0);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.emit(ProgressEvent::workflow_started());
        sink.emit(ProgressEvent::workflow_completed("out.txt", 0.5));
    }
}
