//! Test module for session-level behavior.
//!
//! - **Integration tests**: full frames through a real [`ArcadeHost`](crate::host::ArcadeHost)
//! - **Determinism tests**: identical inputs give identical worlds
//! - **Property tests**: invariants over generated levels and inputs
//! - **Helper functions**: level builders and session setup
//!
//! # Test Structure
//!
//! - `integration.rs`: win, death, glue, boost and persistence end to end
//! - `determinism.rs`: replays compared frame by frame
//! - `properties.rs`: `proptest` invariants
//! - `helpers.rs`: factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
