//! Input: per-frame snapshots of held keys and buttons, mapped to actions.
//!
//! # Invariants
//! - Input is polled, not queued: demos read one snapshot per frame.
//! - The camera is clamped after every frame's deltas are applied.

pub mod action;
pub mod controller;
pub mod snapshot;

pub use action::{Action, CameraKeymap, spawn_action};
pub use controller::CameraController;
pub use snapshot::{InputSnapshot, InputState, Key, MouseButton};

pub fn crate_info() -> &'static str {
    "framelab-input v0.1.0"
}
