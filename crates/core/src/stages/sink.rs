//! Progress and log reporting for a running stage.

use crate::state::ProjectHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tf_protocol::{LogEntry, LogLevel};

/// Reporting channel bound to one project and one stage.
///
/// Every call updates the project under its lock and publishes the
/// resulting event before returning; nothing is buffered.
///
/// Clones share one open flag. After [`StageSink::close`] every clone
/// ignores further reports.
#[derive(Clone)]
pub struct StageSink {
    handle: Arc<ProjectHandle>,
    stage_index: usize,
    agent_name: String,
    open: Arc<AtomicBool>,
}

impl StageSink {
    pub fn new(handle: Arc<ProjectHandle>, stage_index: usize, agent_name: impl Into<String>) -> Self {
        Self {
            handle,
            stage_index,
            agent_name: agent_name.into(),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Stop accepting reports. Called once the stage has returned.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Set the stage's progress (clamped to 100) and current-task label.
    pub async fn progress(&self, percent: u8, label: impl Into<String>) {
        if !self.is_open() {
            return;
        }
        let label = label.into();
        self.handle
            .update_agent(self.stage_index, |agent| {
                agent.progress = percent.min(100);
                agent.current_task = Some(label);
            })
            .await;
    }

    /// Append a log line attributed to this stage's agent.
    pub async fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_open() {
            return;
        }
        self.handle
            .log(LogEntry::new(self.agent_name.clone(), level, message))
            .await;
    }
}
