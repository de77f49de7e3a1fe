use framelab_assets::TextureId;
use framelab_common::Rgba;
use glam::Vec2;

use crate::draw::{DrawCommand, DrawList};

/// Misuse of the sprite batch protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("SpriteBatch::begin must be called before {0}")]
    NotDrawing(&'static str),
    #[error("SpriteBatch::end must be called before begin")]
    AlreadyDrawing,
}

/// Collects sprites and text between `begin` and `end`, then flushes them
/// into a draw list in submission order.
#[derive(Debug)]
pub struct SpriteBatch {
    drawing: bool,
    color: Rgba,
    pending: Vec<DrawCommand>,
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self {
            drawing: false,
            color: Rgba::WHITE,
            pending: Vec::new(),
        }
    }
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Tint for sprites and color for text submitted after this call.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn begin(&mut self) -> Result<(), RenderError> {
        if self.drawing {
            return Err(RenderError::AlreadyDrawing);
        }
        self.drawing = true;
        Ok(())
    }

    /// Queue `texture` stretched over the rectangle at `position` (bottom-left) of `size`.
    pub fn draw(
        &mut self,
        texture: TextureId,
        position: Vec2,
        size: Vec2,
    ) -> Result<(), RenderError> {
        if !self.drawing {
            return Err(RenderError::NotDrawing("draw"));
        }
        self.pending.push(DrawCommand::Sprite {
            texture,
            position,
            size,
            tint: self.color,
        });
        Ok(())
    }

    /// Queue a text run with its top-left corner at `position`.
    pub fn draw_text(&mut self, text: impl Into<String>, position: Vec2) -> Result<(), RenderError> {
        if !self.drawing {
            return Err(RenderError::NotDrawing("draw_text"));
        }
        self.pending.push(DrawCommand::Text {
            text: text.into(),
            position,
            color: self.color,
        });
        Ok(())
    }

    /// Flush queued commands into `out`.
    pub fn end(&mut self, out: &mut DrawList) -> Result<(), RenderError> {
        if !self.drawing {
            return Err(RenderError::NotDrawing("end"));
        }
        self.drawing = false;
        for command in self.pending.drain(..) {
            out.push(command);
        }
        Ok(())
    }
}
