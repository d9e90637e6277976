//! Status aggregation.
//!
//! Pure functions deriving the point-in-time views of a project: overall
//! progress, the current phase label, the status snapshot and the output
//! summary. Callers are responsible for handing in a consistent copy of the
//! project (see [`crate::state::ProjectHandle::status`]).

use tf_protocol::{
    Agent, AgentStatus, FileType, GeneratedFile, ProcessingStatus, Project, ProjectOutput,
    ProjectStatus,
};

/// Floor of the mean agent progress, forced to 100 once the project completed.
pub fn overall_progress(project: &Project) -> u8 {
    if project.status == ProjectStatus::Completed {
        return 100;
    }
    if project.agents.is_empty() {
        return 0;
    }

    let total: usize = project
        .agents
        .iter()
        .map(|agent| usize::from(agent.progress.min(100)))
        .sum();
    let mean = total / project.agents.len();
    u8::try_from(mean.min(100)).unwrap_or(100)
}

/// Label describing what the pipeline is doing, by priority:
/// the first working agent, then all completed, then any failed.
pub fn current_phase(agents: &[Agent]) -> String {
    if let Some(agent) = agents.iter().find(|a| a.status == AgentStatus::Working) {
        let task = agent.current_task.as_deref().unwrap_or("Working");
        return format!("{}: {}", agent.role, task);
    }
    if !agents.is_empty() && agents.iter().all(|a| a.status == AgentStatus::Completed) {
        return "Completed".to_string();
    }
    if agents.iter().any(|a| a.status == AgentStatus::Failed) {
        return "Failed".to_string();
    }
    "Initializing".to_string()
}

/// Build the status snapshot exposing at most `log_limit` of the most recent
/// log entries, oldest first.
pub fn build_status(project: &Project, log_limit: usize) -> ProcessingStatus {
    let skip = project.logs.len().saturating_sub(log_limit);
    ProcessingStatus {
        request_id: project.id,
        status: project.status,
        agents: project.agents.clone(),
        overall_progress: overall_progress(project),
        current_phase: current_phase(&project.agents),
        logs: project.logs[skip..].to_vec(),
    }
}

/// "Generated N files: a frontend, b backend", types in first-seen order.
pub fn summarize_files(files: &[GeneratedFile]) -> String {
    let mut counts: Vec<(FileType, usize)> = Vec::new();
    for file in files {
        match counts.iter_mut().find(|(file_type, _)| *file_type == file.file_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((file.file_type, 1)),
        }
    }

    let noun = if files.len() == 1 { "file" } else { "files" };
    if counts.is_empty() {
        return format!("Generated {} {noun}", files.len());
    }

    let parts: Vec<String> = counts
        .iter()
        .map(|(file_type, count)| format!("{count} {file_type}"))
        .collect();
    format!("Generated {} {noun}: {}", files.len(), parts.join(", "))
}

pub fn project_output(project: &Project) -> ProjectOutput {
    ProjectOutput {
        request_id: project.id,
        files: project.files.clone(),
        summary: summarize_files(&project.files),
    }
}
