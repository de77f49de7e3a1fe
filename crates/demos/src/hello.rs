use framelab_common::{OrthoCamera, Rgba, WindowSize};
use framelab_input::InputSnapshot;
use framelab_render::{Frame, RenderError, SpriteBatch};
use glam::Vec2;

use crate::context::{AppContext, Demo};

const TEXT: &str = "Hello World";
const TEXT_POSITION: Vec2 = Vec2::new(360.0, 360.0);

/// Draws a single line of text in a pixel-sized orthographic view.
pub struct HelloWorld {
    camera: OrthoCamera,
    batch: SpriteBatch,
}

impl Default for HelloWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl HelloWorld {
    pub fn new() -> Self {
        let view = WindowSize::default().as_vec2();
        Self {
            camera: OrthoCamera::to_ortho(view.x, view.y),
            batch: SpriteBatch::new(),
        }
    }
}

impl Demo for HelloWorld {
    fn name(&self) -> &'static str {
        "hello"
    }

    fn update(&mut self, _ctx: &mut AppContext, _input: &InputSnapshot) {}

    fn render(&mut self, _ctx: &AppContext, frame: &mut Frame) -> Result<(), RenderError> {
        frame.camera = self.camera;
        self.batch.begin()?;
        self.batch.set_color(Rgba::WHITE);
        self.batch.draw_text(TEXT, TEXT_POSITION)?;
        self.batch.end(&mut frame.draw)
    }

    fn camera(&self) -> &OrthoCamera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelab_common::LaunchConfig;
    use framelab_render::DrawCommand;

    #[test]
    fn view_is_1280_by_720_pixels() {
        let demo = HelloWorld::new();
        let cam = demo.camera();
        assert_eq!((cam.viewport_width, cam.viewport_height), (1280.0, 720.0));
        assert_eq!(cam.position, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn draws_hello_world_text() {
        let ctx = AppContext::new(LaunchConfig::default());
        let mut demo = HelloWorld::new();
        let mut frame = Frame::default();
        demo.render(&ctx, &mut frame).unwrap();
        assert_eq!(
            frame.draw.commands(),
            &[DrawCommand::Text {
                text: "Hello World".into(),
                position: Vec2::new(360.0, 360.0),
                color: Rgba::WHITE,
            }]
        );
    }

    #[test]
    fn text_lands_at_matching_pixel() {
        let demo = HelloWorld::new();
        let pixel = demo
            .camera()
            .project(TEXT_POSITION, WindowSize::new(1280, 720));
        assert!((pixel - Vec2::new(360.0, 360.0)).length() < 1e-3);
    }
}
