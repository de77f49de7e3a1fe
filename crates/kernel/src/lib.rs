//! Physics kernel: the world, its bodies and fixtures, and the fixed-step clock.
//!
//! The rigid-body solver itself is `rapier2d`; this crate owns the boundary
//! around it.
//!
//! # Invariants
//! - Every step advances simulated time by exactly [`TIME_STEP`].
//! - Bodies are never removed; the body count only grows.
//! - All mutations are appended to the event log, and replaying the log
//!   reproduces the same state hash.

pub mod body;
pub mod rng;
pub mod world;

pub use body::{BodyDef, BodyKind, FixtureDef, Shape};
pub use rng::SplitMix64;
pub use world::{
    BodyView, POSITION_ITERATIONS, PhysicsWorld, STEPS_PER_SECOND, TIME_STEP, VELOCITY_ITERATIONS,
    WorldConfig, WorldError, WorldEvent,
};

pub fn crate_info() -> &'static str {
    "framelab-kernel v0.1.0"
}
