//! # tf-core
//!
//! Coordination core for teamforge.
//!
//! This crate provides:
//! - Configuration loading from the `.teamforge/` directory
//! - The `Stage` abstraction and the default engineering team
//! - The pipeline engine and its per-project state machine
//! - Status aggregation and live event broadcast
//! - Archive bundling of completed projects
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`stages`]: Stage trait, reporting sink and scripted stages
//! - [`engine`]: Pipeline execution engine
//! - [`state`]: Project state and registry
//! - [`status`]: Status snapshots and output summaries
//! - [`broadcast`]: Per-project event fan-out
//! - [`archive`]: Project folders and zip bundles
//! - [`orchestrator`]: Public entry point tying it all together

pub mod archive;
pub mod broadcast;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod state;
pub mod status;

pub use error::{ArchiveError, ForgeError, ForgeResult};
pub use orchestrator::Orchestrator;
