//! Terminal output for pipeline events.

use colored::Colorize;
use std::io::Write;
use std::path::Path;
use tf_protocol::{Agent, AgentStatus, Event, LogEntry, LogLevel, ProjectOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Pretty,
    Quiet,
    Json,
}

/// Print one event according to `mode`.
pub fn event(event: &Event, mode: Mode) -> color_eyre::Result<()> {
    match mode {
        Mode::Quiet => Ok(()),
        Mode::Json => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer(&mut out, event)?;
            writeln!(out)?;
            Ok(())
        }
        Mode::Pretty => {
            if let Some(line) = pretty(event) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn pretty(event: &Event) -> Option<String> {
    match event {
        Event::StatusUpdate { status } => Some(format!(
            "{} {} ({}%) {}",
            "status".bold(),
            status.status,
            status.overall_progress,
            status.current_phase
        )),
        Event::LogUpdate { log, .. } => Some(log_line(log)),
        Event::AgentUpdate { agents, .. } => agents
            .iter()
            .find(|agent| agent.status == AgentStatus::Working)
            .map(agent_line),
        Event::ProjectCompleted { project } => Some(format!(
            "{} {} files generated",
            "✔ Project completed:".green().bold(),
            project.files.len()
        )),
        Event::ProjectFailed { error, .. } => {
            Some(format!("{} {error}", "✘ Project failed:".red().bold()))
        }
    }
}

fn log_line(log: &LogEntry) -> String {
    let time = log.timestamp.format("%H:%M:%S");
    let message = match log.level {
        LogLevel::Info => log.message.normal(),
        LogLevel::Warning => log.message.yellow(),
        LogLevel::Error => log.message.red(),
        LogLevel::Success => log.message.green(),
    };
    format!("{} {} {message}", time.to_string().dimmed(), format!("[{}]", log.agent).cyan())
}

fn agent_line(agent: &Agent) -> String {
    let task = agent.current_task.as_deref().unwrap_or("Working");
    format!("  {} {:>3}% {}", agent.name.dimmed(), agent.progress, task.dimmed())
}

pub fn failure(reason: &str, mode: Mode) {
    if mode == Mode::Quiet {
        eprintln!("{} {reason}", "Project failed:".red().bold());
    }
}

/// Print the output summary and bundle location.
pub fn summary(output: &ProjectOutput, bundle: &Path, mode: Mode) -> color_eyre::Result<()> {
    if mode == Mode::Json {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer(
            &mut out,
            &serde_json::json!({
                "request_id": output.request_id,
                "summary": output.summary,
                "archive": bundle.display().to_string(),
            }),
        )?;
        writeln!(out)?;
        return Ok(());
    }

    println!("{}", output.summary.bold());
    for file in &output.files {
        println!("  {} {}", file.path, format!("({})", file.file_type).dimmed());
    }
    println!("{} {}", "Archive:".bold(), bundle.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_protocol::ProjectStatus;
    use uuid::Uuid;

    #[test]
    fn test_agent_update_shows_working_agent_only() {
        colored::control::set_override(false);
        let mut idle = Agent::new("lead", "Lead Architect", "Design");
        idle.status = AgentStatus::Completed;
        let mut working = Agent::new("frontend", "Frontend Developer", "UI");
        working.status = AgentStatus::Working;
        working.progress = 25;
        working.current_task = Some("Creating component structure".to_string());

        let line = pretty(&Event::AgentUpdate {
            project_id: Uuid::new_v4(),
            agents: vec![idle.clone(), working],
        })
        .expect("working agent is rendered");
        assert_eq!(line, "  Frontend Developer  25% Creating component structure");

        let none = pretty(&Event::AgentUpdate {
            project_id: Uuid::new_v4(),
            agents: vec![idle],
        });
        assert!(none.is_none());
    }

    #[test]
    fn test_failed_event_line() {
        colored::control::set_override(false);
        let line = pretty(&Event::ProjectFailed {
            project_id: Uuid::new_v4(),
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(line, "✘ Project failed: boom");
    }

    #[test]
    fn test_status_line_mentions_phase() {
        colored::control::set_override(false);
        let status = tf_protocol::ProcessingStatus {
            request_id: Uuid::new_v4(),
            status: ProjectStatus::Processing,
            agents: vec![],
            overall_progress: 40,
            current_phase: "UI: Creating components".to_string(),
            logs: vec![],
        };
        let line = pretty(&Event::StatusUpdate { status }).unwrap();
        assert_eq!(line, "status processing (40%) UI: Creating components");
    }
}
