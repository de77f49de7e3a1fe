//! The demos and the per-frame driver that runs exactly one of them.
//!
//! # Invariants
//! - One world step per frame, fixed at 1/60 s.
//! - Camera clamping happens before rendering.
//! - Demos receive the [`AppContext`] explicitly; there is no global state.

mod camera;
mod context;
mod driver;
mod hello;
mod physics;

pub use camera::CameraDemo;
pub use context::{AppContext, Demo, DemoError};
pub use driver::FrameDriver;
pub use hello::HelloWorld;
pub use physics::{PhysicsSandbox, spawn_point};

pub fn crate_info() -> &'static str {
    "framelab-demos v0.1.0"
}
