//! Pipeline stages.
//!
//! - [`Stage`]: the trait every stage implements
//! - [`StageSink`]: progress and log reporting bound to one project/stage
//! - [`ScriptedStage`]: deterministic, script-driven stage
//! - [`default_team`]: the five-stage engineering team

pub mod base;
pub mod scripted;
pub mod sink;
pub mod team;

pub use base::{Stage, StageDescriptor, StageError, StageInput};
pub use scripted::{ScriptStep, ScriptedStage};
pub use sink::StageSink;
pub use team::{default_team, default_team_with_pacing};
