//! Custom assertion helpers for event sequences and projects.

use tf_protocol::{Event, LogLevel, Project, ProjectStatus};

/// Assert that the first event is the initial status snapshot.
#[allow(dead_code)]
pub fn assert_starts_with_snapshot(events: &[Event]) {
    assert!(
        matches!(events.first(), Some(Event::StatusUpdate { .. })),
        "First event should be a status snapshot, got: {:?}",
        events.first()
    );
}

/// Assert that exactly one terminal event exists and that it comes last.
#[allow(dead_code)]
pub fn assert_ends_with_terminal(events: &[Event]) {
    let terminal = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal, 1, "Expected exactly one terminal event");
    assert!(
        events.last().is_some_and(Event::is_terminal),
        "Last event should be terminal, got: {:?}",
        events.last()
    );
}

/// Collect the sequence of project statuses visible in the events,
/// without consecutive duplicates.
#[allow(dead_code)]
pub fn observed_statuses(events: &[Event]) -> Vec<ProjectStatus> {
    let mut statuses: Vec<ProjectStatus> = Vec::new();
    for event in events {
        let status = match event {
            Event::StatusUpdate { status } => Some(status.status),
            Event::LogUpdate { log, .. } if log.message == "Starting project processing" => {
                Some(ProjectStatus::Processing)
            }
            Event::ProjectCompleted { .. } => Some(ProjectStatus::Completed),
            Event::ProjectFailed { .. } => Some(ProjectStatus::Failed),
            _ => None,
        };
        if let Some(status) = status {
            if statuses.last() != Some(&status) {
                statuses.push(status);
            }
        }
    }
    statuses
}

/// Assert that the project holds an error-level entry containing `needle`.
#[allow(dead_code)]
pub fn assert_has_error_log(project: &Project, needle: &str) {
    assert!(
        project
            .logs
            .iter()
            .any(|log| log.level == LogLevel::Error && log.message.contains(needle)),
        "No error log containing {needle:?}"
    );
}
