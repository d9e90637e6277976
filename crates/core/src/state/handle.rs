//! Shared, lock-guarded handle to a single project.

use crate::broadcast::{Broadcast, DeliveryError, EventSink, SubscriberId};
use crate::error::ForgeResult;
use crate::state::project::{
    append_files, complete_project, fail_project, log_to_project, start_project, update_agent,
    SYSTEM_AGENT,
};
use crate::status::build_status;
use std::sync::Arc;
use tf_protocol::{
    Agent, Event, GeneratedFile, LogEntry, LogLevel, ProcessingStatus, Project, ProjectStatus,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// One project's state plus its subscriber registry.
///
/// Every mutation goes through the project lock and publishes while holding
/// it, so a subscriber registered under the same lock sees a snapshot
/// followed by exactly the events that happened after it. Distinct projects
/// never share a lock.
pub struct ProjectHandle {
    id: Uuid,
    state: Mutex<Project>,
    broadcast: Broadcast,
}

impl ProjectHandle {
    pub fn new(project: Project) -> Self {
        let id = project.id;
        Self {
            id,
            state: Mutex::new(project),
            broadcast: Broadcast::new(id),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A full copy of the project as it is right now.
    pub async fn snapshot(&self) -> Project {
        self.state.lock().await.clone()
    }

    pub async fn project_status(&self) -> ProjectStatus {
        self.state.lock().await.status
    }

    /// Status snapshot exposing the `log_limit` most recent log entries.
    pub async fn status(&self, log_limit: usize) -> ProcessingStatus {
        let project = self.state.lock().await;
        build_status(&project, log_limit)
    }

    /// Move the project to processing. Fails without side effects if a run
    /// is already active or the project is terminal.
    pub async fn begin_run(&self) -> ForgeResult<()> {
        let mut project = self.state.lock().await;
        start_project(&mut project, &self.broadcast)
    }

    pub async fn log(&self, entry: LogEntry) {
        let mut project = self.state.lock().await;
        log_to_project(&mut project, &self.broadcast, entry);
    }

    pub async fn log_system(&self, level: LogLevel, message: impl Into<String>) {
        self.log(LogEntry::new(SYSTEM_AGENT, level, message)).await;
    }

    /// Update the agent at `index`; returns whether it exists.
    pub async fn update_agent<F>(&self, index: usize, update: F) -> bool
    where
        F: FnOnce(&mut Agent),
    {
        let mut project = self.state.lock().await;
        update_agent(&mut project, &self.broadcast, index, update)
    }

    pub async fn append_files(&self, files: Vec<GeneratedFile>) {
        let mut project = self.state.lock().await;
        append_files(&mut project, files);
    }

    /// Mark the project completed and return a copy of it.
    ///
    /// The terminal `project_completed` event is not sent here; see
    /// [`ProjectHandle::announce_completed`].
    pub async fn complete(&self) -> Project {
        let mut project = self.state.lock().await;
        complete_project(&mut project, &self.broadcast);
        project.clone()
    }

    /// Mark the project failed, publish `project_failed` and end every
    /// subscription.
    pub async fn fail(&self, reason: &str) {
        let mut project = self.state.lock().await;
        if fail_project(&mut project, &self.broadcast, reason) {
            self.broadcast.close();
        }
    }

    /// Publish `project_completed` with the final project and end every
    /// subscription.
    pub async fn announce_completed(&self) -> Project {
        let project = self.state.lock().await;
        let snapshot = project.clone();
        if snapshot.status == ProjectStatus::Completed {
            self.broadcast.publish(&Event::ProjectCompleted {
                project: Box::new(snapshot.clone()),
            });
            self.broadcast.close();
        }
        snapshot
    }

    /// Register `sink`, delivering a status snapshot first.
    ///
    /// Once the project is terminal no further events will be published, so
    /// the sink receives the snapshot and is not retained.
    pub async fn subscribe(
        &self,
        sink: Arc<dyn EventSink>,
        log_limit: usize,
    ) -> Result<SubscriberId, DeliveryError> {
        let project = self.state.lock().await;
        let initial = Event::StatusUpdate {
            status: build_status(&project, log_limit),
        };
        self.broadcast
            .subscribe(sink, &initial, !project.status.is_terminal())
    }

    pub fn unsubscribe(&self, subscriber: SubscriberId) -> bool {
        self.broadcast.unsubscribe(subscriber)
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcast.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::StageDescriptor;
    use crate::state::create_project;
    use tokio::sync::mpsc;

    fn handle() -> ProjectHandle {
        let stages = vec![
            StageDescriptor::new("lead", "Lead Architect", "System Design", "Planning"),
            StageDescriptor::new("qa", "Test Engineer", "Quality Assurance", "Testing"),
        ];
        ProjectHandle::new(create_project("Build a todo app", "Python", &stages))
    }

    #[tokio::test]
    async fn test_subscriber_sees_snapshot_then_live_events() {
        let handle = handle();
        let (tx, mut rx) = mpsc::channel(16);

        handle.subscribe(Arc::new(tx), 50).await.expect("subscribe");
        handle.begin_run().await.expect("begin");

        match rx.recv().await {
            Some(Event::StatusUpdate { status }) => {
                assert_eq!(status.status, ProjectStatus::Pending);
                assert_eq!(status.request_id, handle.id());
            }
            other => panic!("expected initial snapshot, got {other:?}"),
        }
        match rx.recv().await {
            Some(Event::LogUpdate { log, .. }) => {
                assert_eq!(log.message, "Starting project processing")
            }
            other => panic!("expected log update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_closes_subscriptions() {
        let handle = handle();
        let (tx, mut rx) = mpsc::channel(16);
        handle.subscribe(Arc::new(tx), 50).await.unwrap();
        handle.begin_run().await.unwrap();

        handle.fail("stage exploded").await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(
            events.last(),
            Some(Event::ProjectFailed { error, .. }) if error == "stage exploded"
        ));
        assert_eq!(handle.subscriber_count(), 0);
        assert_eq!(handle.project_status().await, ProjectStatus::Failed);
    }

    #[tokio::test]
    async fn test_terminal_project_subscriber_gets_snapshot_only() {
        let handle = handle();
        handle.begin_run().await.unwrap();
        handle.complete().await;
        handle.announce_completed().await;

        let (tx, mut rx) = mpsc::channel(4);
        handle.subscribe(Arc::new(tx), 50).await.unwrap();

        match rx.recv().await {
            Some(Event::StatusUpdate { status }) => {
                assert_eq!(status.status, ProjectStatus::Completed);
                assert_eq!(status.overall_progress, 100);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
        assert!(rx.recv().await.is_none());
        assert_eq!(handle.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_begin_run_twice_is_rejected() {
        let handle = handle();
        handle.begin_run().await.unwrap();
        let logs_before = handle.snapshot().await.logs.len();

        assert!(handle.begin_run().await.is_err());
        assert_eq!(handle.snapshot().await.logs.len(), logs_before);
    }
}
