use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the solver treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves under simulation.
    Static,
    /// Affected by gravity and collisions.
    Dynamic,
}

/// Collision geometry of a fixture, in body-local space centred on the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned (in body space) box given by half extents.
    Box { half_width: f32, half_height: f32 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn boxed(half_width: f32, half_height: f32) -> Self {
        Shape::Box {
            half_width,
            half_height,
        }
    }

    /// Corners of a box shape in body space, counter-clockwise from bottom-left.
    /// Circles have no corners.
    pub fn corners(&self) -> Option<[Vec2; 4]> {
        match *self {
            Shape::Circle { .. } => None,
            Shape::Box {
                half_width: w,
                half_height: h,
            } => Some([
                Vec2::new(-w, -h),
                Vec2::new(w, -h),
                Vec2::new(w, h),
                Vec2::new(-w, h),
            ]),
        }
    }
}

/// A shape plus material, attached to exactly one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureDef {
    pub shape: Shape,
    pub restitution: f32,
    pub density: f32,
    pub friction: f32,
}

impl FixtureDef {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl Default for FixtureDef {
    fn default() -> Self {
        Self {
            shape: Shape::circle(0.5),
            restitution: 0.0,
            density: 1.0,
            friction: 0.2,
        }
    }
}

/// Initial state of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vec2) -> Self {
        Self { kind, position }
    }

    pub fn dynamic(position: Vec2) -> Self {
        Self::new(BodyKind::Dynamic, position)
    }

    pub fn fixed(position: Vec2) -> Self {
        Self::new(BodyKind::Static, position)
    }
}
