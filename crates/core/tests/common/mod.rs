//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Test fixtures (orchestrators over temp dirs, sample stages)
//! - Custom assertions over event sequences
//! - Mock stages with controllable behavior

pub mod assertions;
pub mod fixtures;
pub mod mock_stages;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_stages::*;
