//! Rendering boundary: renderer-agnostic draw lists.
//!
//! # Invariants
//! - Renderers cannot mutate the physics world.
//! - A frame's draw list is rebuilt from scratch after every clear.

mod batch;
mod draw;
mod renderer;

pub use batch::{RenderError, SpriteBatch};
pub use draw::{DrawCommand, DrawList, Frame};
pub use renderer::{DebugShapeRenderer, DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "framelab-render v0.1.0"
}
