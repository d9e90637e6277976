//! Project state transitions.
//!
//! Free functions that mutate a [`Project`] and publish the matching event.
//! Callers hold the project's lock for the duration of each call, so the
//! mutation and its event are observed together.

use crate::broadcast::Broadcast;
use crate::error::{ForgeError, ForgeResult};
use crate::stages::StageDescriptor;
use chrono::Utc;
use tf_protocol::{Agent, Event, GeneratedFile, LogEntry, LogLevel, Project, ProjectStatus};

/// Name that executor-level log entries are attributed to.
pub const SYSTEM_AGENT: &str = "System";

/// Create a new pending project with one idle agent per stage.
///
/// # Arguments
///
/// * `description` - What the project should build
/// * `language` - Target language tag
/// * `stages` - The pipeline's stages, in execution order
pub fn create_project(description: &str, language: &str, stages: &[StageDescriptor]) -> Project {
    let agents = stages.iter().map(StageDescriptor::agent).collect();
    Project::new(description, language, agents)
}

/// Transition a pending project to processing.
///
/// # Errors
///
/// Returns `ConcurrentRun` if the project is already processing and
/// `Terminal` if it already completed or failed. The project is left
/// untouched in both cases.
pub fn start_project(project: &mut Project, broadcast: &Broadcast) -> ForgeResult<()> {
    match project.status {
        ProjectStatus::Pending => {}
        ProjectStatus::Processing => return Err(ForgeError::ConcurrentRun(project.id)),
        status => {
            return Err(ForgeError::Terminal {
                project_id: project.id,
                status,
            })
        }
    }

    project.status = ProjectStatus::Processing;
    log_to_project(
        project,
        broadcast,
        LogEntry::new(SYSTEM_AGENT, LogLevel::Info, "Starting project processing"),
    );
    Ok(())
}

/// Append a log entry and publish it.
pub fn log_to_project(project: &mut Project, broadcast: &Broadcast, entry: LogEntry) {
    project.logs.push(entry.clone());
    broadcast.publish(&Event::LogUpdate {
        project_id: project.id,
        log: entry,
    });
}

/// Apply `update` to the agent at `index` and publish the full agent list.
///
/// Returns `false` without publishing when `index` is out of range or the
/// project is already completed or failed.
pub fn update_agent<F>(project: &mut Project, broadcast: &Broadcast, index: usize, update: F) -> bool
where
    F: FnOnce(&mut Agent),
{
    if project.status.is_terminal() {
        return false;
    }
    let Some(agent) = project.agents.get_mut(index) else {
        return false;
    };
    update(agent);
    agent.progress = agent.progress.min(100);

    broadcast.publish(&Event::AgentUpdate {
        project_id: project.id,
        agents: project.agents.clone(),
    });
    true
}

/// Append a stage's artifacts in emission order.
pub fn append_files(project: &mut Project, files: Vec<GeneratedFile>) {
    project.files.extend(files);
}

/// Mark a processing project completed.
///
/// Returns `false` if the project was not processing; status never moves
/// out of a terminal state.
pub fn complete_project(project: &mut Project, broadcast: &Broadcast) -> bool {
    if project.status != ProjectStatus::Processing {
        return false;
    }
    project.status = ProjectStatus::Completed;
    project.completed_at = Some(Utc::now());
    log_to_project(
        project,
        broadcast,
        LogEntry::new(SYSTEM_AGENT, LogLevel::Success, "Project completed successfully!"),
    );
    true
}

/// Mark a processing project failed, record the reason and publish
/// `project_failed`.
///
/// Returns `false` if the project was not processing.
pub fn fail_project(project: &mut Project, broadcast: &Broadcast, reason: &str) -> bool {
    if project.status != ProjectStatus::Processing {
        return false;
    }
    project.status = ProjectStatus::Failed;
    log_to_project(
        project,
        broadcast,
        LogEntry::new(SYSTEM_AGENT, LogLevel::Error, format!("Project failed: {reason}")),
    );
    broadcast.publish(&Event::ProjectFailed {
        project_id: project.id,
        error: reason.to_string(),
    });
    true
}
