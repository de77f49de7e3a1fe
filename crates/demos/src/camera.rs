use framelab_assets::{Texture, TextureId};
use framelab_common::OrthoCamera;
use framelab_input::{CameraController, InputSnapshot};
use framelab_render::{Frame, RenderError, SpriteBatch};
use framelab_tools::{CameraStatus, StatusTicker};
use glam::Vec2;

use crate::context::{AppContext, Demo, DemoError};

/// Map size in world units.
const WORLD_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Width of the camera view in world units.
const VIEW_WIDTH: f32 = 30.0;

const MAP_PIXELS: u32 = 256;
const MAP_CELL: u32 = 32;
const MAP_LIGHT: [u8; 4] = [112, 146, 84, 255];
const MAP_DARK: [u8; 4] = [74, 104, 58, 255];

/// Pan, zoom and rotate an orthographic camera over a map sprite.
pub struct CameraDemo {
    camera: OrthoCamera,
    controller: CameraController,
    map: TextureId,
    batch: SpriteBatch,
    ticker: StatusTicker,
}

impl CameraDemo {
    /// Loads the configured map image, or generates a checkerboard when none is set.
    pub fn new(ctx: &mut AppContext) -> Result<Self, DemoError> {
        let map = match &ctx.config.map_image {
            Some(path) => ctx.textures.load_png(path)?,
            None => ctx.textures.insert(Texture::checkerboard(
                MAP_PIXELS, MAP_PIXELS, MAP_CELL, MAP_LIGHT, MAP_DARK,
            )),
        };

        let camera = OrthoCamera::to_ortho(VIEW_WIDTH, VIEW_WIDTH * ctx.window.inverse_aspect());
        let controller = CameraController {
            world_size: WORLD_SIZE,
            ..CameraController::default()
        };

        tracing::info!(map = ?map, "camera demo ready");

        Ok(Self {
            camera,
            controller,
            map,
            batch: SpriteBatch::new(),
            ticker: StatusTicker::new(ctx.config.status_interval),
        })
    }

    pub fn map(&self) -> TextureId {
        self.map
    }

    pub fn status(&self) -> CameraStatus {
        CameraStatus::from(&self.camera)
    }
}

impl Demo for CameraDemo {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn update(&mut self, _ctx: &mut AppContext, input: &InputSnapshot) {
        if self.ticker.tick() {
            tracing::info!("camera status:\n{}", self.status());
        }
        self.controller.update(&mut self.camera, input);
    }

    fn render(&mut self, _ctx: &AppContext, frame: &mut Frame) -> Result<(), RenderError> {
        frame.camera = self.camera;
        self.batch.begin()?;
        self.batch.draw(self.map, Vec2::ZERO, WORLD_SIZE)?;
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
    use framelab_input::Key;
    use framelab_render::DrawCommand;

    const EPS: f32 = 1e-3;

    fn ctx() -> AppContext {
        AppContext::new(LaunchConfig::default())
    }

    fn held(keys: &[Key]) -> InputSnapshot {
        keys.iter()
            .fold(InputSnapshot::new(), |snap, key| snap.with_key(*key))
    }

    fn assert_in_bounds(cam: &OrthoCamera) {
        assert!(cam.zoom >= 0.1 - EPS);
        assert!(cam.zoom <= 100.0 / cam.viewport_width + EPS);
        let eff = cam.effective_viewport();
        assert!(cam.position.x >= eff.x / 2.0 - EPS);
        assert!(cam.position.x <= 100.0 - eff.x / 2.0 + EPS);
        assert!(cam.position.y >= eff.y / 2.0 - EPS);
        assert!(cam.position.y <= 100.0 - eff.y / 2.0 + EPS);
    }

    #[test]
    fn starts_at_bottom_left_of_map() {
        let mut ctx = ctx();
        let demo = CameraDemo::new(&mut ctx).unwrap();
        let cam = demo.camera();
        assert_eq!(cam.viewport_width, 30.0);
        assert_eq!(cam.position.x, 15.0);
        assert!((cam.position.y - 16.875 / 2.0).abs() < EPS);
        assert!(ctx.textures.get(demo.map()).is_some());
    }

    #[test]
    fn pan_right_moves_three_units_per_frame() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        demo.update(&mut ctx, &held(&[Key::Right]));
        assert_eq!(demo.camera().position.x, 18.0);
    }

    #[test]
    fn held_left_stays_clamped_at_edge() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        for _ in 0..10 {
            demo.update(&mut ctx, &held(&[Key::Left, Key::Down]));
        }
        let cam = demo.camera();
        assert_eq!(cam.position.x, 15.0);
        assert!((cam.position.y - 16.875 / 2.0).abs() < EPS);
    }

    #[test]
    fn zoom_is_bounded_both_ways() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        for _ in 0..500 {
            demo.update(&mut ctx, &held(&[Key::A]));
        }
        assert!((demo.camera().zoom - 100.0 / 30.0).abs() < EPS);
        assert_in_bounds(demo.camera());

        for _ in 0..500 {
            demo.update(&mut ctx, &held(&[Key::Q]));
        }
        assert!((demo.camera().zoom - 0.1).abs() < EPS);
        assert_in_bounds(demo.camera());
    }

    #[test]
    fn rotation_accumulates() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        for _ in 0..4 {
            demo.update(&mut ctx, &held(&[Key::E]));
        }
        demo.update(&mut ctx, &held(&[Key::W]));
        assert!((demo.camera().rotation_degrees - 1.5).abs() < EPS);
    }

    #[test]
    fn mixed_input_never_leaves_bounds() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        let script = [
            vec![Key::A, Key::Right, Key::Up],
            vec![Key::A, Key::A, Key::Right],
            vec![Key::Q, Key::Left, Key::W],
            vec![Key::Up, Key::E],
        ];
        for frame in 0..400 {
            demo.update(&mut ctx, &held(&script[frame % script.len()]));
            assert_in_bounds(demo.camera());
        }
    }

    #[test]
    fn renders_map_sprite_over_world() {
        let mut ctx = ctx();
        let mut demo = CameraDemo::new(&mut ctx).unwrap();
        let mut frame = Frame::default();
        demo.render(&ctx, &mut frame).unwrap();
        assert_eq!(frame.draw.len(), 1);
        match &frame.draw.commands()[0] {
            DrawCommand::Sprite {
                texture,
                position,
                size,
                ..
            } => {
                assert_eq!(*texture, demo.map());
                assert_eq!(*position, Vec2::ZERO);
                assert_eq!(*size, WORLD_SIZE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn configured_map_is_loaded() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]))
            .save(tmp.path())
            .unwrap();

        let mut ctx = AppContext::new(LaunchConfig {
            map_image: Some(tmp.path().to_path_buf()),
            ..LaunchConfig::default()
        });
        let demo = CameraDemo::new(&mut ctx).unwrap();
        let map = ctx.textures.require(demo.map()).unwrap();
        assert_eq!((map.width(), map.height()), (4, 4));
    }

    #[test]
    fn missing_map_is_fatal() {
        let mut ctx = AppContext::new(LaunchConfig {
            map_image: Some("/no/such/sc_map.png".into()),
            ..LaunchConfig::default()
        });
        assert!(matches!(
            CameraDemo::new(&mut ctx),
            Err(DemoError::Asset(_))
        ));
    }
}
