use framelab_common::OrthoCamera;
use serde::Serialize;

/// Snapshot of the camera for status readouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraStatus {
    pub viewport: [f32; 2],
    pub zoom: f32,
    pub position: [f32; 2],
    pub rotation_degrees: f32,
}

impl From<&OrthoCamera> for CameraStatus {
    fn from(camera: &OrthoCamera) -> Self {
        Self {
            viewport: [camera.viewport_width, camera.viewport_height],
            zoom: camera.zoom,
            position: camera.position.to_array(),
            rotation_degrees: camera.rotation_degrees,
        }
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "viewport: {:.2} x {:.2}",
            self.viewport[0], self.viewport[1]
        )?;
        writeln!(f, "zoom: {:.3}", self.zoom)?;
        writeln!(
            f,
            "position: ({:.2}, {:.2})",
            self.position[0], self.position[1]
        )?;
        write!(f, "rotation: {:.1} deg", self.rotation_degrees)
    }
}

/// Fires once every `interval` frames.
#[derive(Debug, Clone)]
pub struct StatusTicker {
    interval: u32,
    counter: u32,
}

impl StatusTicker {
    /// An interval of zero is treated as one.
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Count one frame; true on every `interval`-th call.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}
