//! wgpu render backend for the demos.
//!
//! Draw lists are tessellated on the CPU into flat-colored lines and
//! triangles, then drawn with a single orthographic view-projection.
//!
//! # Invariants
//! - Renderer never mutates world state.
//! - Text runs are passed through untouched for the overlay pass.

mod gpu;
mod shaders;
mod tessellate;

pub use gpu::WgpuRenderer;
pub use tessellate::{
    CIRCLE_SEGMENTS, ColorVertex, MAX_SPRITE_CELLS, Tessellation, Tessellator, TextRun,
    tessellate,
};
