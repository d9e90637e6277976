//! Configuration loading and management.
//!
//! Settings live in `.teamforge/config.toml` under a project root, with
//! environment overrides applied on top.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::ForgeConfig;
