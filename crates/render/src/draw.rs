use framelab_assets::TextureId;
use framelab_common::{OrthoCamera, Rgba};
use glam::Vec2;

/// One primitive in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Circle outline plus a radius line along `axis` (unit vector) showing rotation.
    Circle {
        center: Vec2,
        radius: f32,
        axis: Vec2,
        color: Rgba,
    },
    /// Closed polygon outline.
    Polygon { points: Vec<Vec2>, color: Rgba },
    /// Textured rectangle; `position` is the bottom-left corner.
    Sprite {
        texture: TextureId,
        position: Vec2,
        size: Vec2,
        tint: Rgba,
    },
    /// Text run; `position` is the top-left corner of the first line.
    Text {
        text: String,
        position: Vec2,
        color: Rgba,
    },
}

/// Ordered draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, other: DrawList) {
        self.commands.extend(other.commands);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Everything the backend needs to present one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub clear_color: Rgba,
    /// View used for every command in `draw`.
    pub camera: OrthoCamera,
    pub draw: DrawList,
}

impl Frame {
    /// Start a new frame: drop last frame's commands and set the clear color.
    pub fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.draw.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_commands() {
        let mut frame = Frame::default();
        frame.draw.push(DrawCommand::Circle {
            center: Vec2::ZERO,
            radius: 1.0,
            axis: Vec2::X,
            color: Rgba::WHITE,
        });
        frame.clear(Rgba::rgb(0.1, 0.1, 0.1));
        assert!(frame.draw.is_empty());
        assert_eq!(frame.clear_color, Rgba::rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn extend_keeps_order() {
        let mut a = DrawList::new();
        a.push(DrawCommand::Polygon {
            points: vec![],
            color: Rgba::BLACK,
        });
        let mut b = DrawList::new();
        b.push(DrawCommand::Text {
            text: "x".into(),
            position: Vec2::ZERO,
            color: Rgba::WHITE,
        });
        a.extend(b);
        assert_eq!(a.len(), 2);
        assert!(matches!(a.commands()[1], DrawCommand::Text { .. }));
    }
}
