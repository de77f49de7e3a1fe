use framelab_common::BodyId;
use framelab_kernel::{BodyKind, PhysicsWorld};
use serde::Serialize;

/// Physics world inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging
/// and the desktop inspector panel.
pub struct Inspector;

impl Inspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &PhysicsWorld) -> SandboxSummary {
        let mut summary = SandboxSummary {
            tick: world.tick(),
            sim_time: world.sim_time(),
            body_count: world.body_count(),
            static_count: 0,
            dynamic_count: 0,
            awake_count: 0,
            recording: world.config().record_events,
            pending_events: world.events().len(),
        };
        for body in world.bodies() {
            match body.kind {
                BodyKind::Static => summary.static_count += 1,
                BodyKind::Dynamic => {
                    summary.dynamic_count += 1;
                    if !body.sleeping {
                        summary.awake_count += 1;
                    }
                }
            }
        }
        summary
    }

    pub fn inspect_body(world: &PhysicsWorld, id: BodyId) -> Option<BodyInfo> {
        world.body(id).map(|body| BodyInfo {
            id,
            kind: body.kind,
            position: body.position.to_array(),
            angle: body.angle,
            linear_velocity: body.linear_velocity.to_array(),
            sleeping: body.sleeping,
            fixture_count: body.fixtures.len(),
        })
    }

    /// All body IDs in creation order.
    pub fn list_bodies(world: &PhysicsWorld) -> Vec<BodyId> {
        world.bodies().map(|b| b.id).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SandboxSummary {
    pub tick: u64,
    pub sim_time: f64,
    pub body_count: usize,
    pub static_count: usize,
    pub dynamic_count: usize,
    /// Dynamic bodies the solver has not put to sleep.
    pub awake_count: usize,
    /// Whether the world appends mutations to its event log.
    pub recording: bool,
    /// Undrained log entries; zero unless `recording`.
    pub pending_events: usize,
}

impl std::fmt::Display for SandboxSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} time={:.3}s bodies={} (static={} dynamic={} awake={}) pending_events={}",
            self.tick,
            self.sim_time,
            self.body_count,
            self.static_count,
            self.dynamic_count,
            self.awake_count,
            self.pending_events
        )
    }
}

/// Detailed info about a single body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: [f32; 2],
    pub angle: f32,
    pub linear_velocity: [f32; 2],
    pub sleeping: bool,
    pub fixture_count: usize,
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Body [{}] {:?} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}){}",
            self.id,
            self.kind,
            self.position[0],
            self.position[1],
            self.linear_velocity[0],
            self.linear_velocity[1],
            if self.sleeping { " sleeping" } else { "" }
        )
    }
}
