//! Generated artifact models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Type tag attached to every generated artifact.
///
/// The tag drives the output summary and the design-doc context that is
/// handed to every stage after the first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Design,
    Frontend,
    Backend,
    Test,
    Documentation,
}

impl FileType {
    /// The lowercase label used in summaries and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Design => "design",
            FileType::Frontend => "frontend",
            FileType::Backend => "backend",
            FileType::Test => "test",
            FileType::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named piece of output content produced by a stage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GeneratedFile {
    /// Path relative to the project's output folder (e.g. `backend/main.py`).
    pub path: String,

    /// Full text content of the artifact.
    pub content: String,

    /// Artifact type tag.
    #[serde(rename = "type")]
    pub file_type: FileType,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type,
        }
    }
}
