//! The orchestrator: public entry point for submitting and observing projects.
//!
//! Owns the project registry, the pipeline engine and the archive builder.
//! Runs are spawned onto the tokio runtime; everything else is a lookup
//! followed by a call on the project's own handle.

use crate::archive::ArchiveBuilder;
use crate::broadcast::{EventSink, SubscriberId, Subscription};
use crate::config::ForgeConfig;
use crate::engine::PipelineEngine;
use crate::error::{ForgeError, ForgeResult};
use crate::stages::Stage;
use crate::state::{create_project, ProjectHandle, ProjectRegistry};
use crate::status::project_output;
use std::path::PathBuf;
use std::sync::Arc;
use tf_protocol::{ProcessingStatus, Project, ProjectOutput, ProjectStatus};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Coordinates every project of one process.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Orchestrator {
    config: ForgeConfig,
    registry: Arc<ProjectRegistry>,
    engine: Arc<PipelineEngine>,
}

impl Orchestrator {
    /// Create an orchestrator with an empty registry.
    ///
    /// # Arguments
    ///
    /// * `config` - Runtime settings; `output_dir` becomes the archive root
    /// * `stages` - The fixed stage sequence every project runs through
    pub fn new(config: ForgeConfig, stages: Vec<Arc<dyn Stage>>) -> Self {
        Self::with_registry(config, stages, Arc::new(ProjectRegistry::new()))
    }

    /// Create an orchestrator over an existing registry.
    pub fn with_registry(
        config: ForgeConfig,
        stages: Vec<Arc<dyn Stage>>,
        registry: Arc<ProjectRegistry>,
    ) -> Self {
        let archiver = ArchiveBuilder::new(config.output_dir.clone());
        let engine = Arc::new(PipelineEngine::new(stages, archiver));
        Self {
            config,
            registry,
            engine,
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Validate a submission and register a pending project.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the description is blank or longer than
    /// `max_description_len` characters, or the language is blank. Nothing
    /// is registered in that case.
    pub async fn create(&self, description: &str, language: &str) -> ForgeResult<Uuid> {
        self.validate(description, language)?;

        let project = create_project(description, language.trim(), &self.engine.descriptors());
        let id = project.id;
        self.registry
            .insert(Arc::new(ProjectHandle::new(project)))
            .await;

        info!(project_id = %id, language = language.trim(), "Project created");
        Ok(id)
    }

    /// Start the pipeline for a pending project in a background task.
    ///
    /// The project is moved to processing before this returns, so a second
    /// `start` fails immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `ConcurrentRun` if a run is
    /// active and `Terminal` if the project already finished.
    pub async fn start(&self, id: Uuid) -> ForgeResult<JoinHandle<ForgeResult<Project>>> {
        let handle = self.handle(id).await?;
        let run = self.engine.begin(handle).await?;
        let engine = Arc::clone(&self.engine);

        Ok(tokio::spawn(async move {
            let result = engine.execute(run).await;
            if let Err(err) = &result {
                error!(project_id = %id, error = %err, "Project failed");
            }
            result
        }))
    }

    /// Create a project and start its pipeline.
    pub async fn submit(&self, description: &str, language: &str) -> ForgeResult<Uuid> {
        let id = self.create(description, language).await?;
        self.start(id).await?;
        Ok(id)
    }

    /// Current status snapshot.
    pub async fn get_status(&self, id: Uuid) -> ForgeResult<ProcessingStatus> {
        let handle = self.handle(id).await?;
        Ok(handle.status(self.config.snapshot_log_limit).await)
    }

    /// Full copy of the project, including its complete log history.
    pub async fn get_project(&self, id: Uuid) -> ForgeResult<Project> {
        Ok(self.handle(id).await?.snapshot().await)
    }

    /// Every project, in creation order.
    pub async fn list_projects(&self) -> Vec<Project> {
        let mut projects = Vec::new();
        for handle in self.registry.list().await {
            projects.push(handle.snapshot().await);
        }
        projects
    }

    /// Generated files and summary of a completed project.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `NotCompleted` before completion.
    pub async fn get_output(&self, id: Uuid) -> ForgeResult<ProjectOutput> {
        let project = self.completed_project(id).await?;
        Ok(project_output(&project))
    }

    /// Build (or rebuild) the project's bundle and return its path.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `NotCompleted` before completion and
    /// `Archive` if writing fails. A failed download leaves the project
    /// completed.
    pub async fn download(&self, id: Uuid) -> ForgeResult<PathBuf> {
        let project = self.completed_project(id).await?;
        self.engine.archiver().build(&project).await
    }

    /// Subscribe to a project's live events.
    ///
    /// The first event is always a status snapshot. The subscription ends
    /// after the terminal event, immediately for a project that already
    /// finished, or when it falls `subscriber_buffer` events behind.
    pub async fn subscribe(&self, id: Uuid) -> ForgeResult<Subscription> {
        let (tx, rx) = mpsc::channel(self.config.subscriber_buffer);
        let subscriber = self.subscribe_sink(id, Arc::new(tx)).await?;
        Ok(Subscription::new(subscriber, id, rx))
    }

    /// Register a custom sink. It receives the status snapshot first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id and `Delivery` if the sink rejects the
    /// snapshot, in which case it is not registered.
    pub async fn subscribe_sink(
        &self,
        id: Uuid,
        sink: Arc<dyn EventSink>,
    ) -> ForgeResult<SubscriberId> {
        let handle = self.handle(id).await?;
        let subscriber = handle
            .subscribe(sink, self.config.snapshot_log_limit)
            .await?;
        debug!(project_id = %id, subscriber = %subscriber, "Subscriber added");
        Ok(subscriber)
    }

    /// Remove a subscriber. Returns whether it was still registered.
    pub async fn unsubscribe(&self, id: Uuid, subscriber: SubscriberId) -> ForgeResult<bool> {
        Ok(self.handle(id).await?.unsubscribe(subscriber))
    }

    async fn handle(&self, id: Uuid) -> ForgeResult<Arc<ProjectHandle>> {
        self.registry.get(id).await.ok_or(ForgeError::NotFound(id))
    }

    async fn completed_project(&self, id: Uuid) -> ForgeResult<Project> {
        let project = self.handle(id).await?.snapshot().await;
        if project.status != ProjectStatus::Completed {
            return Err(ForgeError::NotCompleted {
                project_id: id,
                status: project.status,
            });
        }
        Ok(project)
    }

    fn validate(&self, description: &str, language: &str) -> ForgeResult<()> {
        if description.trim().is_empty() {
            return Err(ForgeError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        let length = description.chars().count();
        if length > self.config.max_description_len {
            return Err(ForgeError::Validation(format!(
                "description is {length} characters, the limit is {}",
                self.config.max_description_len
            )));
        }
        if language.trim().is_empty() {
            return Err(ForgeError::Validation(
                "language must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
