use glam::Vec2;

use crate::snapshot::{InputSnapshot, Key, MouseButton};

/// A high-level action derived from the input snapshot.
///
/// Demos consume actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Add to the camera zoom.
    Zoom(f32),
    /// Translate the camera along world axes.
    Pan(Vec2),
    /// Rotate the camera, in degrees.
    Rotate(f32),
    /// Spawn a body under the pointer, in window pixels.
    Spawn(Vec2),
}

/// Fixed per-frame deltas bound to held keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraKeymap {
    pub zoom_speed: f32,
    pub move_speed: f32,
    pub rotation_speed: f32,
}

impl Default for CameraKeymap {
    fn default() -> Self {
        Self {
            zoom_speed: 0.02,
            move_speed: 3.0,
            rotation_speed: 0.5,
        }
    }
}

impl CameraKeymap {
    /// Actions for every held camera key, in a fixed order.
    pub fn actions(&self, input: &InputSnapshot) -> Vec<Action> {
        let bindings = [
            (Key::A, Action::Zoom(self.zoom_speed)),
            (Key::Q, Action::Zoom(-self.zoom_speed)),
            (Key::Left, Action::Pan(Vec2::new(-self.move_speed, 0.0))),
            (Key::Right, Action::Pan(Vec2::new(self.move_speed, 0.0))),
            (Key::Down, Action::Pan(Vec2::new(0.0, -self.move_speed))),
            (Key::Up, Action::Pan(Vec2::new(0.0, self.move_speed))),
            (Key::W, Action::Rotate(-self.rotation_speed)),
            (Key::E, Action::Rotate(self.rotation_speed)),
        ];
        bindings
            .into_iter()
            .filter(|(key, _)| input.key_down(*key))
            .map(|(_, action)| action)
            .collect()
    }
}

/// Spawn action while the left button is held over the window.
pub fn spawn_action(input: &InputSnapshot) -> Option<Action> {
    if !input.button_down(MouseButton::Left) {
        return None;
    }
    input.pointer().map(Action::Spawn)
}
