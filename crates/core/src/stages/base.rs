//! Base Stage trait and supporting types.

use crate::stages::sink::StageSink;
use async_trait::async_trait;
use tf_protocol::{Agent, GeneratedFile};
use thiserror::Error;

/// Static identity of a stage: which agent record it drives and how its
/// phase is announced in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Agent id, e.g. "lead".
    pub id: String,
    /// Display name that log entries are attributed to.
    pub name: String,
    pub role: String,
    /// Label used for the "Phase k: ..." log entry.
    pub phase: String,
}

impl StageDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        phase: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            phase: phase.into(),
        }
    }

    /// The idle agent record a new project starts with for this stage.
    pub fn agent(&self) -> Agent {
        Agent::new(self.id.clone(), self.name.clone(), self.role.clone())
    }
}

/// Everything a stage is given to work from.
#[derive(Debug, Clone, Default)]
pub struct StageInput {
    pub description: String,

    pub language: String,

    /// Concatenated design documents from the first stage; empty before it
    /// has run or when it produced none.
    pub design_doc: String,

    /// Artifacts of every stage that already completed, in emission order.
    pub prior_artifacts: Vec<GeneratedFile>,
}

impl StageInput {
    /// Create a StageInput with no design context and no prior artifacts.
    pub fn new(description: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            language: language.into(),
            design_doc: String::new(),
            prior_artifacts: Vec::new(),
        }
    }

    /// Set the design-doc context.
    pub fn with_design_doc(mut self, design_doc: impl Into<String>) -> Self {
        self.design_doc = design_doc.into();
        self
    }

    /// Set the artifacts produced by earlier stages.
    pub fn with_prior_artifacts(mut self, artifacts: Vec<GeneratedFile>) -> Self {
        self.prior_artifacts = artifacts;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("Execution failed: {0}")]
    Execution(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// One unit of the fixed pipeline.
///
/// A stage reports progress and log lines through `sink` while it runs and
/// returns its artifacts when done. Returning an error fails the project.
#[async_trait]
pub trait Stage: Send + Sync {
    fn descriptor(&self) -> &StageDescriptor;

    async fn run(&self, input: &StageInput, sink: &StageSink)
        -> Result<Vec<GeneratedFile>, StageError>;
}
