//! Status snapshot and project output models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::agent_models::Agent;
use crate::file_models::GeneratedFile;
use crate::log_models::LogEntry;
use crate::project_models::ProjectStatus;

/// An immutable, point-in-time view of a project's progress.
///
/// Returned by status queries and sent as the first event to every new
/// subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ProcessingStatus {
    /// The project this snapshot describes.
    #[ts(type = "string")]
    pub request_id: Uuid,

    /// Project lifecycle status at snapshot time.
    pub status: ProjectStatus,

    /// Copy of every agent record.
    pub agents: Vec<Agent>,

    /// Overall progress in percent, within 0..=100.
    pub overall_progress: u8,

    /// Human-readable label of what the pipeline is doing.
    pub current_phase: String,

    /// The most recent log entries, oldest first.
    pub logs: Vec<LogEntry>,
}

/// The generated output of a completed project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ProjectOutput {
    #[ts(type = "string")]
    pub request_id: Uuid,

    /// Every artifact in emission order.
    pub files: Vec<GeneratedFile>,

    /// Per-type counts, e.g. "Generated 3 files: 2 frontend, 1 backend".
    pub summary: String,
}
