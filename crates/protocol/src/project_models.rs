//! Project state models.
//!
//! This module defines the record tracking one submitted unit of work as it
//! moves through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::agent_models::Agent;
use crate::file_models::GeneratedFile;
use crate::log_models::LogEntry;

/// Represents the lifecycle status of a project.
///
/// The status only ever moves forward:
/// Pending -> Processing -> Completed | Failed
///
/// Completed and Failed are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Project has been submitted but the pipeline has not started yet.
    Pending,

    /// The pipeline is running.
    Processing,

    /// Every stage succeeded.
    Completed,

    /// A stage failed; the project will never run again.
    Failed,
}

impl ProjectStatus {
    /// Whether the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Failed)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// The full runtime state of one project.
///
/// Each submission creates a new Project with a unique ID. `files` and
/// `logs` are append-only and keep emission order; `agents` has exactly one
/// entry per pipeline stage.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct Project {
    /// Unique identifier for this project.
    #[ts(type = "string")]
    pub id: Uuid,

    /// What the user asked to be built.
    pub description: String,

    /// Primary language tag (e.g. "Python").
    pub language: String,

    /// Current lifecycle status.
    pub status: ProjectStatus,

    /// When the project was submitted.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,

    /// When the project completed, if it did.
    #[ts(type = "string | null")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Artifacts produced so far, in emission order across stages.
    pub files: Vec<GeneratedFile>,

    /// One record per pipeline stage, in execution order.
    pub agents: Vec<Agent>,

    /// Full log history.
    pub logs: Vec<LogEntry>,
}

impl Project {
    /// Create a pending project with the given per-stage agent records.
    pub fn new(description: impl Into<String>, language: impl Into<String>, agents: Vec<Agent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            language: language.into(),
            status: ProjectStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            files: Vec::new(),
            agents,
            logs: Vec::new(),
        }
    }
}
