//! Project state management.
//!
//! This module provides:
//! - Project state transitions with event publication
//! - `ProjectHandle`, the per-project lock and subscriber registry
//! - `ProjectRegistry` for looking projects up by id

pub mod handle;
pub mod project;
pub mod registry;

pub use handle::ProjectHandle;
pub use project::{create_project, SYSTEM_AGENT};
pub use registry::ProjectRegistry;
