//! Per-project pipeline state machine.
//!
//! The executor drives a project through these states; `next_state` is a
//! pure function so the allowed sequences can be checked without running
//! anything.

use tf_protocol::ProjectStatus;
use thiserror::Error;

/// Where a project's pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Pending,
    /// Executing the stage at this index.
    Running(usize),
    Completed,
    Failed,
}

/// Inputs that move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    StageSucceeded,
    StageFailed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid pipeline transition {transition:?} from {state:?}")]
pub struct InvalidTransition {
    pub state: PipelineState,
    pub transition: Transition,
}

impl PipelineState {
    /// The project status this state is reported as.
    pub fn status(&self) -> ProjectStatus {
        match self {
            PipelineState::Pending => ProjectStatus::Pending,
            PipelineState::Running(_) => ProjectStatus::Processing,
            PipelineState::Completed => ProjectStatus::Completed,
            PipelineState::Failed => ProjectStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed)
    }
}

/// Compute the state following `state` for a pipeline of `stage_count` stages.
///
/// A pipeline with no stages completes as soon as it starts.
pub fn next_state(
    state: PipelineState,
    transition: Transition,
    stage_count: usize,
) -> Result<PipelineState, InvalidTransition> {
    let next = match (state, transition) {
        (PipelineState::Pending, Transition::Start) if stage_count == 0 => PipelineState::Completed,
        (PipelineState::Pending, Transition::Start) => PipelineState::Running(0),
        (PipelineState::Running(index), Transition::StageSucceeded) if index + 1 >= stage_count => {
            PipelineState::Completed
        }
        (PipelineState::Running(index), Transition::StageSucceeded) => PipelineState::Running(index + 1),
        (PipelineState::Running(_), Transition::StageFailed) => PipelineState::Failed,
        _ => return Err(InvalidTransition { state, transition }),
    };
    Ok(next)
}
