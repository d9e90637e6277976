//! Events broadcast to live project subscribers.
//!
//! Every subscriber first receives a `StatusUpdate` snapshot, followed by the
//! live events published while the project's pipeline runs.
//!
//! Uses tagged enum serialization for TypeScript compatibility:
//! ```json
//! {
//!   "type": "log_update",
//!   "payload": {
//!     "project_id": "uuid-here",
//!     "log": { "agent": "System", "level": "info", "message": "..." }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::agent_models::Agent;
use crate::log_models::LogEntry;
use crate::project_models::Project;
use crate::status_models::ProcessingStatus;

/// Events sent from the pipeline to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    /// Snapshot of the current status, delivered once on subscribe.
    StatusUpdate { status: ProcessingStatus },

    /// A new entry was appended to the project log.
    LogUpdate {
        #[ts(type = "string")]
        project_id: Uuid,
        log: LogEntry,
    },

    /// An agent record changed; carries the full current agent list.
    AgentUpdate {
        #[ts(type = "string")]
        project_id: Uuid,
        agents: Vec<Agent>,
    },

    /// Every stage succeeded; carries the full project.
    ProjectCompleted { project: Box<Project> },

    /// A stage failed and the project is terminal.
    ProjectFailed {
        #[ts(type = "string")]
        project_id: Uuid,
        error: String,
    },
}

impl Event {
    /// The project this event belongs to.
    pub fn project_id(&self) -> Uuid {
        match self {
            Event::StatusUpdate { status } => status.request_id,
            Event::LogUpdate { project_id, .. }
            | Event::AgentUpdate { project_id, .. }
            | Event::ProjectFailed { project_id, .. } => *project_id,
            Event::ProjectCompleted { project } => project.id,
        }
    }

    /// Whether this event ends the stream of a project's run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::ProjectCompleted { .. } | Event::ProjectFailed { .. })
    }
}
