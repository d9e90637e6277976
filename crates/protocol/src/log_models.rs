//! Log entry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Severity of a project log entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// A single entry in a project's append-only log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct LogEntry {
    /// Unique identifier of this entry.
    #[ts(type = "string")]
    pub id: Uuid,

    /// When the entry was recorded.
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,

    /// Name of the agent (or `System`) that produced the entry.
    pub agent: String,

    /// Severity level.
    pub level: LogLevel,

    /// Free-form message text.
    pub message: String,
}

impl LogEntry {
    /// Create a new entry stamped with a fresh id and the current time.
    pub fn new(agent: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            agent: agent.into(),
            level,
            message: message.into(),
        }
    }
}
