//! Test fixtures for orchestrators and event collection.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tf_core::broadcast::Subscription;
use tf_core::config::ForgeConfig;
use tf_core::stages::{default_team, Stage};
use tf_core::Orchestrator;
use tf_protocol::Event;

/// An orchestrator writing into its own temp dir.
///
/// The TempDir must be kept alive for the test duration.
#[allow(dead_code)]
pub struct TestForge {
    pub dir: TempDir,
    pub orchestrator: Orchestrator,
}

/// Config rooted in `dir` with every other setting at its default.
#[allow(dead_code)]
pub fn test_config(dir: &TempDir) -> ForgeConfig {
    ForgeConfig {
        output_dir: dir.path().join("output"),
        ..ForgeConfig::default()
    }
}

/// Orchestrator running the given stages.
#[allow(dead_code)]
pub fn forge_with(stages: Vec<Arc<dyn Stage>>) -> TestForge {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let orchestrator = Orchestrator::new(test_config(&dir), stages);
    TestForge { dir, orchestrator }
}

/// Orchestrator running the default five-stage team.
#[allow(dead_code)]
pub fn default_forge() -> TestForge {
    forge_with(default_team())
}

/// Drain a subscription until its terminal event, its end, or `timeout`.
#[allow(dead_code)]
pub async fn collect_events_until_timeout(
    subscription: &mut Subscription,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        match tokio::time::timeout(Duration::from_millis(100), subscription.recv()).await {
            Ok(Some(event)) => {
                let is_terminal = event.is_terminal();
                events.push(event);
                if is_terminal {
                    break;
                }
            }
            Ok(None) => break,  // Stream closed
            Err(_) => continue, // Timeout, keep waiting
        }
    }

    events
}
