//! Append-only run log for crew executions.
//!
//! Events are stored in NDJSON format (one JSON object per line), default
//! path `reports/events.ndjson`. Each event carries an RFC3339 timestamp,
//! the action, the actor (`user@HOST`), an optional task name, and a
//! freeform details object.
//!
//! Logging is best-effort: a failure to append never aborts the pipeline;
//! the crew warns on stderr and carries on.

use crate::error::{CrewlError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions recorded in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Pipeline run started.
    RunStart,
    /// One task started executing.
    TaskStart,
    /// One task completed.
    TaskComplete,
    /// The terminal report was written to disk.
    ReportWritten,
    /// Pipeline run completed.
    RunComplete,
    /// Pipeline run aborted on a task failure.
    RunFailed,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventAction::RunStart => "run_start",
            EventAction::TaskStart => "task_start",
            EventAction::TaskComplete => "task_complete",
            EventAction::ReportWritten => "report_written",
            EventAction::RunComplete => "run_complete",
            EventAction::RunFailed => "run_failed",
        };
        write!(f, "{}", name)
    }
}

/// One record in the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who ran the pipeline (`user@HOST`).
    pub actor: String,

    /// Task name for task-scoped events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Freeform details object.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the task name for this event.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single NDJSON line (no trailing newline).
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CrewlError::RuntimeError(format!("failed to serialize event: {}", e)))
    }
}

/// `user@HOST`, matching what a human would expect to see in an audit log.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Handle to the append-only run log file.
///
/// A disabled log (used by tests and `plan`) swallows every append.
#[derive(Debug)]
pub struct RunLog {
    path: Option<PathBuf>,
}

impl RunLog {
    /// Log to the given NDJSON file, creating parent directories on first
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// The log file path, if logging is enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one event.
    pub fn append(&mut self, event: &Event) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                CrewlError::RuntimeError(format!(
                    "failed to create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let line = event.to_ndjson_line()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                CrewlError::RuntimeError(format!(
                    "failed to open run log '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            CrewlError::RuntimeError(format!(
                "failed to append to run log '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
