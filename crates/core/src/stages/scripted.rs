//! Deterministic, script-driven stage implementation.

use crate::stages::base::{Stage, StageDescriptor, StageError, StageInput};
use crate::stages::sink::StageSink;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tf_protocol::{GeneratedFile, LogLevel};

/// One scripted action, replayed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Progress(u8, String),
    Log(LogLevel, String),
    Pause(Duration),
}

type RenderFn = dyn Fn(&StageInput) -> Vec<GeneratedFile> + Send + Sync;

/// A stage that replays a fixed script of progress updates, log lines and
/// pauses, then returns its files.
///
/// Files come from two places: a static list and an optional render
/// function that templates artifacts from the [`StageInput`].
#[derive(Clone)]
pub struct ScriptedStage {
    descriptor: StageDescriptor,
    steps: Vec<ScriptStep>,
    files: Vec<GeneratedFile>,
    render: Option<Arc<RenderFn>>,
    failure: Option<String>,
}

impl ScriptedStage {
    pub fn new(descriptor: StageDescriptor) -> Self {
        Self {
            descriptor,
            steps: Vec::new(),
            files: Vec::new(),
            render: None,
            failure: None,
        }
    }

    pub fn progress(mut self, percent: u8, label: impl Into<String>) -> Self {
        self.steps.push(ScriptStep::Progress(percent, label.into()));
        self
    }

    pub fn log(mut self, level: LogLevel, message: impl Into<String>) -> Self {
        self.steps.push(ScriptStep::Log(level, message.into()));
        self
    }

    pub fn pause(mut self, duration: Duration) -> Self {
        if !duration.is_zero() {
            self.steps.push(ScriptStep::Pause(duration));
        }
        self
    }

    pub fn file(mut self, file: GeneratedFile) -> Self {
        self.files.push(file);
        self
    }

    /// Template additional files from the stage input at run time.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&StageInput) -> Vec<GeneratedFile> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Replay the script, then fail with `reason` instead of returning files.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

#[async_trait]
impl Stage for ScriptedStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(
        &self,
        input: &StageInput,
        sink: &StageSink,
    ) -> Result<Vec<GeneratedFile>, StageError> {
        if input.description.trim().is_empty() {
            return Err(StageError::InvalidInput("empty project description".to_string()));
        }

        for step in &self.steps {
            match step {
                ScriptStep::Progress(percent, label) => sink.progress(*percent, label.clone()).await,
                ScriptStep::Log(level, message) => sink.log(*level, message.clone()).await,
                ScriptStep::Pause(duration) => tokio::time::sleep(*duration).await,
            }
        }

        if let Some(reason) = &self.failure {
            return Err(StageError::Execution(reason.clone()));
        }

        let mut files = self.files.clone();
        if let Some(render) = &self.render {
            files.extend(render(input));
        }
        Ok(files)
    }
}
