//! Developer tooling: world inspector, camera status readout, status ticker.
//!
//! # Invariants
//! - Tools only read state; nothing here mutates the world or camera.

mod inspector;
mod status;

pub use inspector::{BodyInfo, Inspector, SandboxSummary};
pub use status::{CameraStatus, StatusTicker};

pub fn crate_info() -> &'static str {
    "framelab-tools v0.1.0"
}
