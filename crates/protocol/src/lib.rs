//! # tf-protocol
//!
//! Core protocol definitions and data models for teamforge.
//!
//! This crate defines all shared data structures used for:
//! - The project record and its per-stage agent records
//! - Generated artifacts and log entries
//! - Point-in-time status snapshots and project output
//! - Events broadcast to live subscribers
//!
//! ## Modules
//!
//! - [`agent_models`]: Per-stage agent records and their status
//! - [`file_models`]: Generated artifacts and their type tags
//! - [`log_models`]: Log entries and levels
//! - [`project_models`]: The project record and its lifecycle status
//! - [`status_models`]: Status snapshots and project output
//! - [`ipc`]: Events delivered to subscribers
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, chrono and uuid
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other teamforge crates

pub mod agent_models;
pub mod file_models;
pub mod ipc;
pub mod log_models;
pub mod project_models;
pub mod status_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use file_models::*;
pub use ipc::*;
pub use log_models::*;
pub use project_models::*;
pub use status_models::*;
