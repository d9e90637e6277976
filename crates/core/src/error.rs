//! Error taxonomy for the coordination core.
//!
//! Validation, lookup and concurrency errors are rejected at the call
//! boundary without touching project state. Stage failures are recorded on
//! the project before they surface here. Archive errors never revert a
//! completed project.

use crate::broadcast::DeliveryError;
use crate::engine::machine::InvalidTransition;
use std::path::PathBuf;
use thiserror::Error;
use tf_protocol::ProjectStatus;
use uuid::Uuid;

/// Errors returned by the orchestrator, the pipeline engine and the archive builder.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// The submission was malformed.
    #[error("Invalid submission: {0}")]
    Validation(String),

    /// No project is registered under this id.
    #[error("Project {0} not found")]
    NotFound(Uuid),

    /// Output or download was requested before the project completed.
    #[error("Project {project_id} is not completed yet (status: {status})")]
    NotCompleted {
        project_id: Uuid,
        status: ProjectStatus,
    },

    /// A stage reported a failure; the project is now failed.
    #[error("Stage '{stage}' failed: {reason}")]
    StageFailure { stage: String, reason: String },

    /// A run is already active for this project.
    #[error("Project {0} is already being processed")]
    ConcurrentRun(Uuid),

    /// The project already reached a terminal status and cannot run again.
    #[error("Project {project_id} is already {status}")]
    Terminal {
        project_id: Uuid,
        status: ProjectStatus,
    },

    /// The pipeline state machine rejected a transition.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// A new subscriber could not take its initial snapshot.
    #[error("Subscriber rejected the initial snapshot: {0}")]
    Delivery(#[from] DeliveryError),

    /// Writing the project files or the bundle failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Errors raised while materializing a project to disk.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A generated file path escapes the project folder.
    #[error("Refusing to write unsafe path '{0}'")]
    UnsafePath(String),

    #[error("Archive task did not finish: {0}")]
    Join(String),
}

/// Type alias for Result with ForgeError.
pub type ForgeResult<T> = Result<T, ForgeError>;
