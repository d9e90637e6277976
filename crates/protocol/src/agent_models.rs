//! Per-stage agent records.
//!
//! Every project carries one [`Agent`] per pipeline stage. The record is
//! created idle when the project is submitted and is then driven by the
//! pipeline executor as its stage runs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle status of a single stage's agent within a project.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// The stage has not started yet.
    Idle,

    /// The stage is currently executing.
    Working,

    /// The stage finished and its artifacts were accepted.
    Completed,

    /// The stage reported a failure.
    Failed,
}

/// Represents the agent executing one stage of a project's pipeline.
///
/// The index of an agent in [`crate::Project::agents`] is its execution
/// order; the list length never changes after project creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Agent {
    /// Stable identifier of this agent record.
    pub id: String,

    /// Human-readable agent name (e.g. "Lead Architect").
    ///
    /// Log entries reported by the stage are attributed to this name.
    pub name: String,

    /// The role the agent plays in the team (e.g. "Project Lead & System Design").
    pub role: String,

    /// Current lifecycle status.
    pub status: AgentStatus,

    /// Progress of the stage in percent, always within 0..=100.
    pub progress: u8,

    /// Label of the task the stage is currently working on.
    #[serde(default)]
    pub current_task: Option<String>,
}

impl Agent {
    /// Create an idle agent record with zero progress.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            status: AgentStatus::Idle,
            progress: 0,
            current_task: None,
        }
    }
}
