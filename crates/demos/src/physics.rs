use framelab_common::{BodyId, OrthoCamera, WindowSize};
use framelab_input::{Action, InputSnapshot, spawn_action};
use framelab_kernel::{BodyDef, FixtureDef, PhysicsWorld, Shape, SplitMix64, WorldConfig, WorldError};
use framelab_render::{DebugShapeRenderer, Frame, RenderError, Renderer};
use glam::Vec2;

use crate::context::{AppContext, Demo, DemoError};

/// Width of the physics view in world units.
const VIEW_WIDTH: f32 = 30.0;

const GROUND_POSITION: Vec2 = Vec2::new(15.0, 2.0);
const GROUND_HALF_EXTENTS: Vec2 = Vec2::new(10.0, 1.0);

const GRID_COLUMNS: std::ops::Range<i32> = 5..25;
const GRID_ROWS: std::ops::Range<i32> = 15..30;
const GRID_OFFSET: f32 = 0.2;
const GRID_RADIUS: f32 = 0.2;
const GRID_RESTITUTION: f32 = 0.5;

const SPAWN_RESTITUTION: f32 = 0.9;

/// Map a window pixel (origin top-left, y down) into the camera's
/// unrotated, unzoomed viewport (origin bottom-left, y up).
pub fn spawn_point(screen: Vec2, camera: &OrthoCamera, window: WindowSize) -> Vec2 {
    let size = window.as_vec2();
    Vec2::new(
        screen.x * camera.viewport_width / size.x,
        camera.viewport_height - screen.y * camera.viewport_height / size.y,
    )
}

/// Falling circles over a static ground; holding the left button spawns more.
pub struct PhysicsSandbox {
    world: PhysicsWorld,
    camera: OrthoCamera,
    rng: SplitMix64,
    renderer: DebugShapeRenderer,
    ground: BodyId,
}

impl PhysicsSandbox {
    pub fn new(ctx: &AppContext) -> Result<Self, DemoError> {
        let camera = OrthoCamera::to_ortho(VIEW_WIDTH, VIEW_WIDTH * ctx.window.inverse_aspect());
        let mut world = PhysicsWorld::new(WorldConfig {
            max_bodies: ctx.config.max_bodies,
            record_events: ctx.config.record_events,
            ..WorldConfig::default()
        });
        let mut rng = SplitMix64::new(ctx.config.seed);

        let ground = world.spawn(
            BodyDef::fixed(GROUND_POSITION),
            FixtureDef::new(Shape::boxed(GROUND_HALF_EXTENTS.x, GROUND_HALF_EXTENTS.y)),
        )?;

        'grid: for i in GRID_COLUMNS {
            for k in GRID_ROWS {
                let offset = if rng.next_bool() { GRID_OFFSET } else { 0.0 };
                let result = world.spawn(
                    BodyDef::dynamic(Vec2::new(i as f32 + offset, k as f32)),
                    FixtureDef::new(Shape::circle(GRID_RADIUS)).with_restitution(GRID_RESTITUTION),
                );
                match result {
                    Ok(_) => {}
                    Err(WorldError::BodyLimit { limit }) => {
                        tracing::debug!(limit, "body limit reached while building grid");
                        break 'grid;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        tracing::info!(
            bodies = world.body_count(),
            viewport_height = camera.viewport_height,
            "physics sandbox ready"
        );

        Ok(Self {
            world,
            camera,
            rng,
            renderer: DebugShapeRenderer::new(),
            ground,
        })
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn ground(&self) -> BodyId {
        self.ground
    }

    /// Drop a ball with a random radius in `0.05..=0.5` at a world point.
    pub fn spawn_ball(&mut self, at: Vec2) -> Result<BodyId, WorldError> {
        let radius = self.rng.range_inclusive(1, 10) as f32 / 20.0;
        self.world.spawn(
            BodyDef::dynamic(at),
            FixtureDef::new(Shape::circle(radius)).with_restitution(SPAWN_RESTITUTION),
        )
    }
}

impl Demo for PhysicsSandbox {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn update(&mut self, ctx: &mut AppContext, input: &InputSnapshot) {
        if let Some(Action::Spawn(screen)) = spawn_action(input) {
            let at = spawn_point(screen, &self.camera, ctx.window);
            match self.spawn_ball(at) {
                Ok(id) => tracing::trace!(%id, x = at.x, y = at.y, "spawned ball"),
                Err(err) => tracing::debug!("spawn skipped: {err}"),
            }
        }
        self.world.step();
    }

    fn render(&mut self, _ctx: &AppContext, frame: &mut Frame) -> Result<(), RenderError> {
        frame.camera = self.camera;
        frame.draw.extend(self.renderer.render(&self.world, &self.camera));
        Ok(())
    }

    fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    fn world(&self) -> Option<&PhysicsWorld> {
        Some(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelab_common::LaunchConfig;
    use framelab_input::{InputState, MouseButton};
    use framelab_kernel::{BodyKind, TIME_STEP};

    const GRID_BODIES: usize = 300;

    fn ctx() -> AppContext {
        AppContext::new(LaunchConfig::default())
    }

    fn click(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::new().with_button_at(MouseButton::Left, Vec2::new(x, y))
    }

    // Ground plus the 20x15 grid; no fixtureless extra body, so 301 rather than 302.
    #[test]
    fn init_builds_ground_and_grid() {
        let demo = PhysicsSandbox::new(&ctx()).unwrap();
        let world = demo.physics();
        assert_eq!(world.body_count(), 1 + GRID_BODIES);

        let ground = world.body(demo.ground()).unwrap();
        assert_eq!(ground.kind, BodyKind::Static);
        assert_eq!(ground.position, GROUND_POSITION);

        for body in world.bodies().skip(1) {
            assert_eq!(body.kind, BodyKind::Dynamic);
            let fixture = body.fixtures[0];
            assert_eq!(fixture.shape, Shape::circle(0.2));
            assert_eq!(fixture.restitution, 0.5);
            let frac = body.position.x - body.position.x.floor();
            assert!(frac.abs() < 1e-4 || (frac - 0.2).abs() < 1e-4);
            assert!((15.0..30.0).contains(&body.position.y));
        }
    }

    #[test]
    fn camera_fits_window_aspect() {
        let demo = PhysicsSandbox::new(&ctx()).unwrap();
        let cam = demo.camera();
        assert_eq!(cam.viewport_width, 30.0);
        assert!((cam.viewport_height - 16.875).abs() < 1e-4);
        assert_eq!(cam.position, Vec2::new(15.0, cam.viewport_height / 2.0));
    }

    #[test]
    fn spawn_point_formula_holds_across_window() {
        let window = WindowSize::new(1280, 720);
        let cam = OrthoCamera::to_ortho(30.0, 16.875);
        for sx in (0..=1280).step_by(64) {
            for sy in (0..=720).step_by(48) {
                let p = spawn_point(Vec2::new(sx as f32, sy as f32), &cam, window);
                let expected = Vec2::new(
                    sx as f32 * 30.0 / 1280.0,
                    16.875 - sy as f32 * 16.875 / 720.0,
                );
                assert!((p - expected).length() < 1e-4, "({sx}, {sy})");
            }
        }
    }

    #[test]
    fn spawn_point_corners() {
        let window = WindowSize::new(1280, 720);
        let cam = OrthoCamera::to_ortho(30.0, 16.875);
        assert_eq!(spawn_point(Vec2::ZERO, &cam, window), Vec2::new(0.0, 16.875));
        assert_eq!(
            spawn_point(Vec2::new(1280.0, 720.0), &cam, window),
            Vec2::new(30.0, 0.0)
        );
    }

    #[test]
    fn held_button_spawns_once_per_frame() {
        let mut ctx = ctx();
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        let initial = demo.physics().body_count();

        for frame in 0..30 {
            let input = if frame < 12 {
                click(640.0, 100.0)
            } else {
                InputSnapshot::new()
            };
            demo.update(&mut ctx, &input);
        }
        assert_eq!(demo.physics().body_count(), initial + 12);
    }

    #[test]
    fn button_without_pointer_does_not_spawn() {
        let mut ctx = ctx();
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        let initial = demo.physics().body_count();
        let mut state = InputState::new();
        state.button(MouseButton::Left, true);
        demo.update(&mut ctx, state.snapshot());
        assert_eq!(demo.physics().body_count(), initial);
    }

    #[test]
    fn spawned_ball_lands_under_pointer_with_bounded_radius() {
        let mut ctx = ctx();
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        demo.update(&mut ctx, &click(640.0, 360.0));

        let spawned = demo.physics().bodies().last().unwrap();
        let fixture = spawned.fixtures[0];
        assert_eq!(fixture.restitution, 0.9);
        match fixture.shape {
            Shape::Circle { radius } => assert!((0.05..=0.5).contains(&radius)),
            other => panic!("unexpected {other:?}"),
        }
        // One step of gravity has moved it only slightly.
        assert!((spawned.position - Vec2::new(15.0, 8.4375)).length() < 0.05);
    }

    #[test]
    fn each_frame_advances_one_fixed_step() {
        let mut ctx = ctx();
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        for _ in 0..90 {
            demo.update(&mut ctx, &InputSnapshot::new());
        }
        assert_eq!(demo.physics().tick(), 90);
        assert!((demo.physics().sim_time() - 1.5).abs() < 1e-9);
        assert_eq!(TIME_STEP, 1.0 / 60.0);
    }

    #[test]
    fn body_limit_skips_spawns() {
        let config = LaunchConfig {
            max_bodies: Some(1 + GRID_BODIES + 2),
            ..LaunchConfig::default()
        };
        let mut ctx = AppContext::new(config);
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        for _ in 0..5 {
            demo.update(&mut ctx, &click(100.0, 100.0));
        }
        assert_eq!(demo.physics().body_count(), 1 + GRID_BODIES + 2);
        assert_eq!(demo.physics().tick(), 5);
    }

    #[test]
    fn small_body_limit_truncates_grid() {
        let config = LaunchConfig {
            max_bodies: Some(10),
            ..LaunchConfig::default()
        };
        let demo = PhysicsSandbox::new(&AppContext::new(config)).unwrap();
        assert_eq!(demo.physics().body_count(), 10);
    }

    #[test]
    fn same_seed_same_grid() {
        let a = PhysicsSandbox::new(&ctx()).unwrap();
        let b = PhysicsSandbox::new(&ctx()).unwrap();
        assert_eq!(a.physics().state_hash(), b.physics().state_hash());
    }

    #[test]
    fn render_draws_ground_first_through_demo_camera() {
        let ctx = ctx();
        let mut demo = PhysicsSandbox::new(&ctx).unwrap();
        let mut frame = Frame::default();
        demo.render(&ctx, &mut frame).unwrap();
        // Grid rows above the view are culled.
        assert!(frame.draw.len() > 1);
        assert!(frame.draw.len() <= 1 + GRID_BODIES);
        assert!(matches!(
            frame.draw.commands()[0],
            framelab_render::DrawCommand::Polygon { .. }
        ));
        assert_eq!(frame.camera, *demo.camera());
    }
}
