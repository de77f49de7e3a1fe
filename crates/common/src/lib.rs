//! Shared types for the framelab demos.
//!
//! # Invariants
//! - No engine state lives here; these are plain values passed between crates.

mod camera;
mod config;
mod types;

pub use camera::OrthoCamera;
pub use config::{ConfigError, DemoKind, LaunchConfig};
pub use types::{BodyId, Rgba, WindowSize, clamp};

pub fn crate_info() -> &'static str {
    "framelab-common v0.1.0"
}
