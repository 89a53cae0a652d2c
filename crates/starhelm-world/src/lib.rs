//! Fixed-step host for any number of steered ships among static and drifting
//! obstacles.
//!
//! Tick order: fold queued thrust into velocities, snapshot every collider,
//! run each ship's engine against that snapshot, record telemetry, then move
//! bodies. Engines never see each other's writes from the same tick.

mod ledger;

pub use ledger::{Ledger, LedgerEvent};

use starhelm_collision::ObstacleSnapshot;
use starhelm_core::{
    BodyId, EngineParams, Isometry, Obstacle, Scalar, StepCtx, StepHasher, Vec3, Velocity,
};
use starhelm_dynamics::{BodyDesc, Bodies};
use starhelm_flight::{EngineSystem, FlightControls, FlightReport};
use starhelm_geom::{aabb_of, Shape};
use tracing::debug;

const LEDGER_CAP: usize = 1 << 16;

/* ---------------- Collider & Ship ---------------- */
#[derive(Copy, Clone, Debug)]
pub struct Collider {
    pub body: BodyId,
    pub shape: Shape,
}

struct ShipInstance {
    body: BodyId,
    engine: EngineSystem,
}

/// Totals for one call to [`World::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub tick: u64,
    pub ships: u32,
    pub colliders: u32,
    pub possible_collisions: u32,
    pub skipped: u32,
    pub max_speed: Scalar,
}

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    pub bodies: usize,
    pub record_ledger: bool,
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

impl WorldBuilder {
    pub fn new() -> Self { Self { bodies: 64, record_ledger: true } }

    pub fn with_capacity(mut self, bodies: usize) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn record_ledger(mut self, on: bool) -> Self {
        self.record_ledger = on;
        self
    }

    pub fn build(self) -> World {
        let mut w = World::with_capacity(self.bodies);
        w.record_ledger = self.record_ledger;
        w
    }
}

/* ---------------- World ---------------- */
pub struct World {
    bodies: Bodies,
    colliders: Vec<Collider>,
    ships: Vec<ShipInstance>,
    snapshot: ObstacleSnapshot,
    tick: u64,
    ledger: Ledger,
    record_ledger: bool,
}

impl Default for World {
    fn default() -> Self { Self::with_capacity(0) }
}

impl World {
    pub fn with_capacity(bodies: usize) -> Self {
        Self {
            bodies: Bodies::with_capacity(bodies),
            colliders: Vec::with_capacity(bodies),
            ships: Vec::new(),
            snapshot: ObstacleSnapshot::with_capacity(bodies),
            tick: 0,
            ledger: Ledger::new(LEDGER_CAP),
            record_ledger: true,
        }
    }

    // Read-only helpers for runners and tests.
    pub fn num_bodies(&self) -> u32 { self.bodies.len() as u32 }
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    pub fn get_body_pose(&self, id: BodyId) -> Isometry { self.bodies.pose(id) }
    pub fn get_body_vel(&self, id: BodyId) -> Velocity { self.bodies.vel(id) }
    pub fn set_body_vel(&mut self, id: BodyId, v: Velocity) { self.bodies.set_vel(id, v); }
    pub fn set_body_pose(&mut self, id: BodyId, pose: Isometry) { self.bodies.set_pose(id, pose); }
    pub fn ledger(&self) -> &Ledger { &self.ledger }
    pub fn ledger_mut(&mut self) -> &mut Ledger { &mut self.ledger }
    pub fn colliders(&self) -> &[Collider] { &self.colliders }

    pub fn ship_ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.ships.iter().map(|s| s.body)
    }

    /// Add a steered hull. Its collider is a sphere of `params.radius`.
    pub fn add_ship(&mut self, pose: Isometry, vel: Velocity, params: EngineParams, controls: FlightControls) -> BodyId {
        let body = self.bodies.add(BodyDesc { pose, vel, dynamic: true });
        self.colliders.push(Collider { body, shape: Shape::Sphere { r: params.radius } });
        self.ships.push(ShipInstance { body, engine: EngineSystem::new(params).with_controls(controls) });
        body
    }

    /// Add an unsteered collider. Static obstacles never move and report zero velocity.
    pub fn add_obstacle(&mut self, pose: Isometry, vel: Velocity, shape: Shape, dynamic: bool) -> BodyId {
        let vel = if dynamic { vel } else { Velocity::default() };
        let body = self.bodies.add(BodyDesc { pose, vel, dynamic });
        self.colliders.push(Collider { body, shape });
        body
    }

    pub fn controls_mut(&mut self, ship: BodyId) -> Option<&mut FlightControls> {
        self.ships.iter_mut().find(|s| s.body == ship).map(|s| &mut s.engine.controls)
    }

    pub fn engine(&self, ship: BodyId) -> Option<&EngineSystem> {
        self.ships.iter().find(|s| s.body == ship).map(|s| &s.engine)
    }

    pub fn step(&mut self, dt: Scalar) -> StepStats {
        self.tick = self.tick.wrapping_add(1);
        let ctx = StepCtx::new(dt, self.tick);
        let mut stats = StepStats {
            tick: self.tick,
            ships: self.ships.len() as u32,
            ..StepStats::default()
        };

        self.bodies.integrate_velocities(dt);
        self.rebuild_snapshot();
        stats.colliders = self.snapshot.len() as u32;

        for ship in &mut self.ships {
            let Some(mut handle) = self.bodies.handle_mut(ship.body) else { continue; };
            let report = ship.engine.step(ctx, &mut handle, &self.snapshot);

            stats.possible_collisions += report.collisions as u32;
            stats.max_speed = stats.max_speed.max(report.speed);
            if report.skipped { stats.skipped += 1; }
            if self.record_ledger {
                record(&mut self.ledger, ship.body, &report, &ship.engine);
            }
        }

        self.bodies.integrate_poses(dt);
        debug!(tick = stats.tick, collisions = stats.possible_collisions, skipped = stats.skipped, "world step");
        stats
    }

    fn rebuild_snapshot(&mut self) {
        self.snapshot.clear();
        for c in &self.colliders {
            let pose = self.bodies.pose(c.body);
            let velocity = if self.bodies.is_dynamic(c.body) { self.bodies.vel(c.body).lin } else { Vec3::ZERO };
            let obstacle = Obstacle {
                id: c.body,
                position: pose.pos,
                velocity,
                radius: c.shape.bounding_radius(),
            };
            self.snapshot.push(obstacle, aabb_of(&c.shape, &pose));
        }
        self.snapshot.finish();
    }

    /// Digest of every body's pose and velocity, in id order.
    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.tick(self.tick);
        for i in self.bodies.indices() {
            h.body(i, &self.bodies.pose(i), &self.bodies.vel(i));
        }
        h.finalize()
    }
}

fn record(ledger: &mut Ledger, ship: BodyId, r: &FlightReport, engine: &EngineSystem) {
    let tick = r.tick;
    if r.skipped {
        ledger.push(LedgerEvent::Skipped { tick, ship });
        return;
    }
    for c in engine.possible_collisions() {
        ledger.push(LedgerEvent::PossibleCollision {
            tick,
            ship,
            obstacle: c.obstacle,
            time_to_impact: c.time_to_impact,
        });
    }
    if r.avoidance != Vec3::ZERO {
        ledger.push(LedgerEvent::Avoidance { tick, ship, force: r.avoidance });
    }
    if r.goal.direction != Vec3::ZERO {
        ledger.push(LedgerEvent::Goal { tick, ship, direction: r.goal.direction, speed: r.goal.speed });
    }
    ledger.push(LedgerEvent::Steering { tick, ship, angular_velocity: r.angular_velocity });
    ledger.push(LedgerEvent::Propulsion { tick, ship, throttle: r.throttle, speed: r.speed });
}
