use framelab_common::{OrthoCamera, Rgba};
use framelab_kernel::{BodyKind, BodyView, PhysicsWorld, Shape};
use glam::Vec2;

use crate::draw::{DrawCommand, DrawList};

/// Renderer-agnostic interface. All world renderers implement this trait.
///
/// The renderer reads world state and a camera, then produces output. It
/// never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and camera.
    fn render(&self, world: &PhysicsWorld, camera: &OrthoCamera) -> Self::Output;
}

/// Wireframe outlines of every fixture in the world.
///
/// Fixtures entirely outside the camera's view are skipped.
#[derive(Debug, Clone, Copy)]
pub struct DebugShapeRenderer {
    pub static_color: Rgba,
    pub awake_color: Rgba,
    pub sleeping_color: Rgba,
}

impl Default for DebugShapeRenderer {
    fn default() -> Self {
        Self {
            static_color: Rgba::rgb(0.5, 0.9, 0.5),
            awake_color: Rgba::rgb(0.9, 0.7, 0.7),
            sleeping_color: Rgba::rgb(0.6, 0.6, 0.6),
        }
    }
}

impl DebugShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn color_for(&self, body: &BodyView<'_>) -> Rgba {
        match (body.kind, body.sleeping) {
            (BodyKind::Static, _) => self.static_color,
            (BodyKind::Dynamic, true) => self.sleeping_color,
            (BodyKind::Dynamic, false) => self.awake_color,
        }
    }
}

/// Conservative visibility test: the camera's bounding circle against the shape's.
fn visible(camera: &OrthoCamera, center: Vec2, extent: f32) -> bool {
    let view_radius = camera.effective_viewport().length() / 2.0;
    center.distance(camera.position) <= view_radius + extent
}

fn bounding_radius(shape: &Shape) -> f32 {
    match *shape {
        Shape::Circle { radius } => radius,
        Shape::Box {
            half_width,
            half_height,
        } => Vec2::new(half_width, half_height).length(),
    }
}

impl Renderer for DebugShapeRenderer {
    type Output = DrawList;

    fn render(&self, world: &PhysicsWorld, camera: &OrthoCamera) -> DrawList {
        let mut out = DrawList::new();
        let mut culled = 0usize;
        for body in world.bodies() {
            let on_screen = body
                .fixtures
                .iter()
                .any(|f| visible(camera, body.position, bounding_radius(&f.shape)));
            if !on_screen {
                culled += usize::from(!body.fixtures.is_empty());
                continue;
            }
            let color = self.color_for(&body);
            let axis = Vec2::from_angle(body.angle);
            for fixture in body.fixtures {
                match fixture.shape {
                    Shape::Circle { radius } => out.push(DrawCommand::Circle {
                        center: body.position,
                        radius,
                        axis,
                        color,
                    }),
                    Shape::Box { .. } => {
                        let points = fixture
                            .shape
                            .corners()
                            .map(|corners| {
                                corners
                                    .iter()
                                    .map(|c| body.position + axis.rotate(*c))
                                    .collect()
                            })
                            .unwrap_or_default();
                        out.push(DrawCommand::Polygon { points, color });
                    }
                }
            }
        }
        tracing::trace!(commands = out.len(), culled, "debug shapes");
        out
    }
}

/// Human-readable dump of the world and camera.
///
/// Used by the CLI and in tests; exercises the same trait as the wireframe
/// renderer.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &PhysicsWorld, camera: &OrthoCamera) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Physics World (tick={}, time={:.3}s) ===\n",
            world.tick(),
            world.sim_time()
        ));
        out.push_str(&format!("Bodies: {}\n", world.body_count()));
        out.push_str(&format!(
            "Camera: pos=({:.1}, {:.1}) viewport={:.1}x{:.1} zoom={:.2} rotation={:.1}\n",
            camera.position.x,
            camera.position.y,
            camera.viewport_width,
            camera.viewport_height,
            camera.zoom,
            camera.rotation_degrees
        ));

        for body in world.bodies() {
            let kind = match body.kind {
                BodyKind::Static => "static",
                BodyKind::Dynamic => "dynamic",
            };
            out.push_str(&format!(
                "  [{}] {kind} pos=({:.2}, {:.2}) angle={:.2} fixtures={}\n",
                body.id,
                body.position.x,
                body.position.y,
                body.angle,
                body.fixtures.len()
            ));
        }

        out
    }
}
