use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use framelab_common::BodyId;
use glam::Vec2;
use rapier2d::dynamics::{
    CCDSolver, CoefficientCombineRule, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};
use rapier2d::geometry::{ColliderBuilder, ColliderSet, DefaultBroadPhase, NarrowPhase};
use rapier2d::na::Vector2;
use rapier2d::pipeline::PhysicsPipeline;
use serde::{Deserialize, Serialize};

use crate::body::{BodyDef, BodyKind, FixtureDef, Shape};

/// Simulation steps per simulated second.
pub const STEPS_PER_SECOND: u32 = 60;
/// Fixed step length. Every call to [`PhysicsWorld::step`] advances exactly this much.
pub const TIME_STEP: f32 = 1.0 / STEPS_PER_SECOND as f32;
pub const VELOCITY_ITERATIONS: usize = 6;
pub const POSITION_ITERATIONS: usize = 2;

/// Errors from world mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("body limit of {limit} reached")]
    BodyLimit { limit: usize },
    #[error("unknown body {0}")]
    UnknownBody(BodyId),
    #[error("replayed body id {replayed} does not match assigned id {assigned}")]
    ReplayMismatch { replayed: BodyId, assigned: BodyId },
}

/// An event record produced by every mutation to the world.
///
/// Replaying the log into a fresh world with the same config reproduces
/// the same state, step for step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    BodyCreated { id: BodyId, def: BodyDef },
    FixtureAttached { id: BodyId, fixture: FixtureDef },
    /// Simulation advanced to the given tick.
    Stepped { tick: u64 },
}

/// World-level settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub gravity: Vec2,
    /// Upper bound on bodies of any kind. `None` means unbounded.
    pub max_bodies: Option<usize>,
    /// Append every mutation to the event log. Off by default, since the
    /// log grows by one entry per step.
    #[serde(default)]
    pub record_events: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            max_bodies: None,
            record_events: false,
        }
    }
}

/// Read-only view of one body at the current tick.
#[derive(Debug, Clone, Copy)]
pub struct BodyView<'a> {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub sleeping: bool,
    pub fixtures: &'a [FixtureDef],
}

#[derive(Debug, Clone)]
struct BodyRecord {
    kind: BodyKind,
    handle: RigidBodyHandle,
    fixtures: Vec<FixtureDef>,
}

/// Solver state owned by the world. Never exposed outside this module.
struct Solver {
    gravity: Vector2<f32>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl Solver {
    fn new(gravity: Vec2) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = TIME_STEP;
        params.num_solver_iterations =
            NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(NonZeroUsize::MIN);
        params.num_internal_stabilization_iterations = POSITION_ITERATIONS;

        Self {
            gravity: Vector2::new(gravity.x, gravity.y),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }

    fn insert_body(&mut self, def: &BodyDef) -> RigidBodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let body = builder
            .translation(Vector2::new(def.position.x, def.position.y))
            .build();
        self.bodies.insert(body)
    }

    fn attach(&mut self, handle: RigidBodyHandle, fixture: &FixtureDef) {
        let builder = match fixture.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
        };
        let collider = builder
            .restitution(fixture.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .density(fixture.density)
            .friction(fixture.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
    }

    fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }
}

/// The physics world: all bodies, the gravity vector and the fixed-step clock.
///
/// Bodies are only ever added. With [`WorldConfig::record_events`] set, every
/// mutation is appended to the event log.
/// Uses BTreeMap so body iteration follows creation order.
pub struct PhysicsWorld {
    config: WorldConfig,
    records: BTreeMap<BodyId, BodyRecord>,
    next_id: u64,
    tick: u64,
    event_log: Vec<WorldEvent>,
    solver: Solver,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("config", &self.config)
            .field("bodies", &self.records.len())
            .field("tick", &self.tick)
            .field("events", &self.event_log.len())
            .finish_non_exhaustive()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl PhysicsWorld {
    /// Create an empty world at tick 0.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            records: BTreeMap::new(),
            next_id: 0,
            tick: 0,
            event_log: Vec::new(),
            solver: Solver::new(config.gravity),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds: `tick / 60`, independent of wall-clock time.
    pub fn sim_time(&self) -> f64 {
        self.tick as f64 / STEPS_PER_SECOND as f64
    }

    pub fn body_count(&self) -> usize {
        self.records.len()
    }

    /// Recorded events not yet drained. Always empty unless recording is on.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Add a body with no fixtures.
    pub fn create_body(&mut self, def: BodyDef) -> Result<BodyId, WorldError> {
        if let Some(limit) = self.config.max_bodies {
            if self.records.len() >= limit {
                return Err(WorldError::BodyLimit { limit });
            }
        }
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let handle = self.solver.insert_body(&def);
        self.records.insert(
            id,
            BodyRecord {
                kind: def.kind,
                handle,
                fixtures: Vec::new(),
            },
        );
        self.record(WorldEvent::BodyCreated { id, def });
        Ok(id)
    }

    /// Attach a fixture to an existing body.
    pub fn create_fixture(&mut self, id: BodyId, fixture: FixtureDef) -> Result<(), WorldError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(WorldError::UnknownBody(id))?;
        self.solver.attach(record.handle, &fixture);
        record.fixtures.push(fixture);
        self.record(WorldEvent::FixtureAttached { id, fixture });
        Ok(())
    }

    /// Create a body and attach a single fixture to it.
    pub fn spawn(&mut self, def: BodyDef, fixture: FixtureDef) -> Result<BodyId, WorldError> {
        let id = self.create_body(def)?;
        self.create_fixture(id, fixture)?;
        Ok(id)
    }

    /// Advance the simulation by one fixed step of [`TIME_STEP`] seconds.
    pub fn step(&mut self) {
        let _span = tracing::debug_span!("world_step", tick = self.tick).entered();
        self.solver.step();
        self.tick += 1;
        self.record(WorldEvent::Stepped { tick: self.tick });
    }

    fn record(&mut self, event: WorldEvent) {
        if self.config.record_events {
            self.event_log.push(event);
        }
    }

    pub fn body(&self, id: BodyId) -> Option<BodyView<'_>> {
        self.records.get(&id).map(|record| self.view(id, record))
    }

    /// All bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = BodyView<'_>> + '_ {
        self.records.iter().map(|(id, record)| self.view(*id, record))
    }

    fn view<'a>(&'a self, id: BodyId, record: &'a BodyRecord) -> BodyView<'a> {
        let pose = self.solver.bodies.get(record.handle);
        let (position, angle, linear_velocity, sleeping) = match pose {
            Some(rb) => {
                let t = rb.translation();
                let v = rb.linvel();
                (
                    Vec2::new(t.x, t.y),
                    rb.rotation().angle(),
                    Vec2::new(v.x, v.y),
                    rb.is_sleeping(),
                )
            }
            None => (Vec2::ZERO, 0.0, Vec2::ZERO, false),
        };
        BodyView {
            id,
            kind: record.kind,
            position,
            angle,
            linear_velocity,
            sleeping,
            fixtures: &record.fixtures,
        }
    }

    /// Reconstruct a world by replaying an event log.
    pub fn replay(config: WorldConfig, events: &[WorldEvent]) -> Result<Self, WorldError> {
        let mut world = Self::new(config);
        for event in events {
            match event {
                WorldEvent::BodyCreated { id, def } => {
                    let assigned = world.create_body(*def)?;
                    if assigned != *id {
                        return Err(WorldError::ReplayMismatch {
                            replayed: *id,
                            assigned,
                        });
                    }
                }
                WorldEvent::FixtureAttached { id, fixture } => {
                    world.create_fixture(*id, *fixture)?;
                }
                WorldEvent::Stepped { .. } => world.step(),
            }
        }
        Ok(world)
    }

    /// Deterministic hash of tick and body poses, in creation order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for body in self.bodies() {
            mix(&mut h, &body.id.0.to_le_bytes());
            mix(&mut h, &body.position.x.to_le_bytes());
            mix(&mut h, &body.position.y.to_le_bytes());
            mix(&mut h, &body.angle.to_le_bytes());
            mix(&mut h, &(body.fixtures.len() as u64).to_le_bytes());
        }
        h
    }
}
