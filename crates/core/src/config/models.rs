//! Runtime settings for the orchestrator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings loaded from `.teamforge/config.toml`.
///
/// Every field is optional in the file; missing fields take their defaults.
///
/// # Example
///
/// ```toml
/// # .teamforge/config.toml
/// output_dir = "build/projects"
/// max_description_len = 5000
/// snapshot_log_limit = 50
/// subscriber_buffer = 256
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ForgeConfig {
    /// Root under which every project folder and bundle is written.
    pub output_dir: PathBuf,

    /// Longest accepted project description, in characters.
    pub max_description_len: usize,

    /// Number of most recent log entries exposed by a status snapshot.
    pub snapshot_log_limit: usize,

    /// Queue depth of each subscriber channel. A subscriber that falls this
    /// far behind is dropped.
    pub subscriber_buffer: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            max_description_len: 10_000,
            snapshot_log_limit: 50,
            subscriber_buffer: 256,
        }
    }
}
