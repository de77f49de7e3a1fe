use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::types::WindowSize;

/// Orthographic 2D camera: viewport size in world units, position, zoom, rotation.
///
/// A pure view transform. The camera owns nothing it renders; the render
/// backend reads [`OrthoCamera::combined`] once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Centre of the view in world space.
    pub position: Vec2,
    /// Scale applied to the viewport. Above 1 shows more of the world.
    pub zoom: f32,
    /// Rotation of the camera's up vector, in degrees, counter-clockwise.
    pub rotation_degrees: f32,
}

impl OrthoCamera {
    /// Camera with the given viewport, centred on the origin.
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            position: Vec2::ZERO,
            zoom: 1.0,
            rotation_degrees: 0.0,
        }
    }

    /// Camera whose bottom-left corner sits at the world origin (y up).
    pub fn to_ortho(viewport_width: f32, viewport_height: f32) -> Self {
        let mut cam = Self::new(viewport_width, viewport_height);
        cam.center_on_viewport();
        cam
    }

    /// Move the camera so the (zoomed) viewport starts at the world origin.
    pub fn center_on_viewport(&mut self) {
        self.position = Vec2::new(
            self.zoom * self.viewport_width / 2.0,
            self.zoom * self.viewport_height / 2.0,
        );
    }

    /// Translate along world axes (independent of rotation).
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Rotate the camera's up vector around the view axis.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_degrees += degrees;
    }

    /// Viewport size after zoom, in world units.
    pub fn effective_viewport(&self) -> Vec2 {
        Vec2::new(
            self.viewport_width * self.zoom,
            self.viewport_height * self.zoom,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(-self.rotation_degrees.to_radians())
            * Mat4::from_translation(-self.position.extend(0.0))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.effective_viewport() / 2.0;
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
    }

    /// Projection times view.
    pub fn combined(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a world point to window pixels (origin top-left, y down).
    pub fn project(&self, world: Vec2, window: WindowSize) -> Vec2 {
        let clip: Vec4 = self.combined() * Vec3::new(world.x, world.y, 0.0).extend(1.0);
        let ndc = Vec2::new(clip.x, clip.y) / clip.w;
        let size = window.as_vec2();
        Vec2::new((ndc.x + 1.0) / 2.0 * size.x, (1.0 - ndc.y) / 2.0 * size.y)
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
