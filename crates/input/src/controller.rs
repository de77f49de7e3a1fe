use framelab_common::{OrthoCamera, clamp};
use glam::Vec2;

use crate::action::{Action, CameraKeymap};
use crate::snapshot::InputSnapshot;

/// Applies held-key camera actions, then clamps the camera to the world bounds.
///
/// Clamping happens after all deltas of a frame, so an unclamped camera is
/// never rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    pub keymap: CameraKeymap,
    /// World extent; the view never leaves `0..world_size` on either axis.
    pub world_size: Vec2,
    pub min_zoom: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            keymap: CameraKeymap::default(),
            world_size: Vec2::new(100.0, 100.0),
            min_zoom: 0.1,
        }
    }
}

impl CameraController {
    pub fn update(&self, camera: &mut OrthoCamera, input: &InputSnapshot) {
        for action in self.keymap.actions(input) {
            self.apply(camera, action);
        }
        self.clamp(camera);
    }

    /// Apply one unclamped delta.
    pub fn apply(&self, camera: &mut OrthoCamera, action: Action) {
        match action {
            Action::Zoom(delta) => camera.zoom += delta,
            Action::Pan(delta) => camera.translate(delta),
            Action::Rotate(degrees) => camera.rotate(degrees),
            Action::Spawn(_) => {}
        }
    }

    /// Largest zoom at which the viewport still fits the world horizontally.
    pub fn max_zoom(&self, camera: &OrthoCamera) -> f32 {
        self.world_size.x / camera.viewport_width
    }

    pub fn clamp(&self, camera: &mut OrthoCamera) {
        camera.zoom = clamp(camera.zoom, self.min_zoom, self.max_zoom(camera));

        let half = camera.effective_viewport() / 2.0;
        camera.position.x = clamp(camera.position.x, half.x, self.world_size.x - half.x);
        camera.position.y = clamp(camera.position.y, half.y, self.world_size.y - half.y);
    }
}
