//! Pipeline execution engine.
//!
//! The PipelineEngine runs the fixed stage sequence for one project, driving
//! the state machine in [`machine`], forwarding stage progress into the
//! project's state and building the archive once the project completes.

pub mod machine;

use crate::archive::ArchiveBuilder;
use crate::error::{ForgeError, ForgeResult};
use crate::stages::{Stage, StageDescriptor, StageError, StageInput, StageSink};
use crate::state::ProjectHandle;
use machine::{next_state, PipelineState, Transition};
use std::sync::Arc;
use tf_protocol::{AgentStatus, FileType, GeneratedFile, LogEntry, LogLevel, Project};
use tokio::task::JoinError;
use tracing::{info, warn};

/// Proof that a project was moved to processing by [`PipelineEngine::begin`].
///
/// Holding one is the only way to execute the stages, which keeps a project
/// to at most one active run.
pub struct ActiveRun {
    handle: Arc<ProjectHandle>,
    state: PipelineState,
}

impl ActiveRun {
    pub fn project_id(&self) -> uuid::Uuid {
        self.handle.id()
    }
}

/// The main pipeline execution engine.
pub struct PipelineEngine {
    stages: Vec<Arc<dyn Stage>>,
    archiver: ArchiveBuilder,
}

impl PipelineEngine {
    /// Create a new PipelineEngine.
    ///
    /// # Arguments
    ///
    /// * `stages` - The stages to run, in order
    /// * `archiver` - Builds the bundle of every completed project
    pub fn new(stages: Vec<Arc<dyn Stage>>, archiver: ArchiveBuilder) -> Self {
        Self { stages, archiver }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn descriptors(&self) -> Vec<StageDescriptor> {
        self.stages
            .iter()
            .map(|stage| stage.descriptor().clone())
            .collect()
    }

    pub fn archiver(&self) -> &ArchiveBuilder {
        &self.archiver
    }

    /// Move a pending project to processing.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentRun` if the project is already processing and
    /// `Terminal` if it already completed or failed; neither changes the
    /// project.
    pub async fn begin(&self, handle: Arc<ProjectHandle>) -> ForgeResult<ActiveRun> {
        handle.begin_run().await?;
        let state = next_state(PipelineState::Pending, Transition::Start, self.stages.len())?;
        info!(project_id = %handle.id(), stages = self.stages.len(), "Starting project processing");
        Ok(ActiveRun { handle, state })
    }

    /// Execute a pipeline run to its end and return the final project.
    ///
    /// This method:
    /// 1. Runs every stage in order, giving each the design doc and the
    ///    artifacts of the stages before it
    /// 2. Stops at the first failing stage and marks the project failed
    /// 3. Otherwise marks the project completed and builds its archive
    ///
    /// # Errors
    ///
    /// Returns `StageFailure` after the failure has been recorded on the
    /// project and announced to subscribers.
    pub async fn execute(&self, run: ActiveRun) -> ForgeResult<Project> {
        let ActiveRun { handle, mut state } = run;
        let project = handle.snapshot().await;
        let mut artifacts: Vec<GeneratedFile> = Vec::new();
        let mut design_doc = String::new();

        while let PipelineState::Running(index) = state {
            let Some(stage) = self.stages.get(index) else {
                break;
            };
            let descriptor = stage.descriptor();
            handle
                .log_system(
                    LogLevel::Info,
                    format!("Phase {}: {}", index + 1, descriptor.phase),
                )
                .await;

            let input = StageInput::new(project.description.clone(), project.language.clone())
                .with_design_doc(design_doc.clone())
                .with_prior_artifacts(artifacts.clone());

            match self.run_stage(&handle, index, stage, &input).await {
                Ok(files) => {
                    if index == 0 {
                        design_doc = extract_design_doc(&files);
                    }
                    handle.append_files(files.clone()).await;
                    artifacts.extend(files);
                    handle
                        .log_system(LogLevel::Success, format!("Completed {}", descriptor.role))
                        .await;
                    state = next_state(state, Transition::StageSucceeded, self.stages.len())?;
                }
                Err(reason) => {
                    state = next_state(state, Transition::StageFailed, self.stages.len())?;
                    warn!(
                        project_id = %handle.id(),
                        stage = %descriptor.name,
                        status = %state.status(),
                        error = %reason,
                        "Stage failed"
                    );
                    handle.fail(&reason).await;
                    return Err(ForgeError::StageFailure {
                        stage: descriptor.name.clone(),
                        reason,
                    });
                }
            }
        }

        let completed = handle.complete().await;
        info!(project_id = %handle.id(), files = completed.files.len(), "Project completed");

        match self.archiver.build(&completed).await {
            Ok(path) => {
                handle
                    .log_system(
                        LogLevel::Success,
                        format!("Project archive created: {}", path.display()),
                    )
                    .await;
            }
            Err(err) => {
                warn!(project_id = %handle.id(), error = %err, "Archive creation failed");
                handle
                    .log_system(LogLevel::Warning, format!("Archive creation failed: {err}"))
                    .await;
            }
        }

        Ok(handle.announce_completed().await)
    }

    /// Begin and execute a run in one call.
    pub async fn run(&self, handle: Arc<ProjectHandle>) -> ForgeResult<Project> {
        let run = self.begin(handle).await?;
        self.execute(run).await
    }

    /// Run one stage, keeping its agent record in step. Returns the failure
    /// reason on error.
    ///
    /// The stage runs in its own task so that a panic surfaces as a failure
    /// of this stage. Its sink is closed as soon as the task ends.
    async fn run_stage(
        &self,
        handle: &Arc<ProjectHandle>,
        index: usize,
        stage: &Arc<dyn Stage>,
        input: &StageInput,
    ) -> Result<Vec<GeneratedFile>, String> {
        let descriptor = stage.descriptor();
        let sink = StageSink::new(Arc::clone(handle), index, descriptor.name.clone());

        handle
            .update_agent(index, |agent| {
                agent.status = AgentStatus::Working;
                agent.progress = 0;
                agent.current_task = Some("Starting...".to_string());
            })
            .await;
        sink.log(LogLevel::Info, format!("Starting {}", descriptor.role))
            .await;

        let task = {
            let stage = Arc::clone(stage);
            let input = input.clone();
            let sink = sink.clone();
            tokio::spawn(async move { stage.run(&input, &sink).await })
        };
        let outcome = task
            .await
            .unwrap_or_else(|err| Err(StageError::Execution(panic_reason(err))));
        sink.close();

        match outcome {
            Ok(files) => {
                handle
                    .update_agent(index, |agent| {
                        agent.status = AgentStatus::Completed;
                        agent.progress = 100;
                        agent.current_task = Some("Completed".to_string());
                    })
                    .await;
                Ok(files)
            }
            Err(err) => {
                let reason = err.to_string();
                handle
                    .update_agent(index, |agent| {
                        agent.status = AgentStatus::Failed;
                        agent.current_task = Some(format!("Failed: {reason}"));
                    })
                    .await;
                handle
                    .log(LogEntry::new(
                        descriptor.name.clone(),
                        LogLevel::Error,
                        format!("Agent failed: {reason}"),
                    ))
                    .await;
                Err(reason)
            }
        }
    }
}

fn panic_reason(err: JoinError) -> String {
    if !err.is_panic() {
        return "stage task was cancelled".to_string();
    }
    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("stage panicked: {message}")
}

/// Concatenate the content of every design-tagged file, in emission order,
/// separated by newlines. Empty when there is none.
pub fn extract_design_doc(files: &[GeneratedFile]) -> String {
    files
        .iter()
        .filter(|file| file.file_type == FileType::Design)
        .map(|file| file.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
