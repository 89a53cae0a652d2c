use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use glam::Quat;
use serde::{Deserialize, Serialize};
use starhelm_core::{iso, BodyId, EngineParams, SteeringStrategy, Vec3, Velocity};
use starhelm_flight::{FlightControls, PathHint, PilotMode};
use starhelm_geom::Shape;
use starhelm_world::{World, WorldBuilder};

fn default_dt() -> f32 { 0.02 }
fn default_ticks() -> u32 { 500 }
fn default_throttle() -> f32 { 1.0 }
fn default_true() -> bool { true }

/// On-disk scene description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    pub ships: Vec<ShipDesc>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDesc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShipDesc {
    pub position: [f32; 3],
    /// Heading about +Y (deg); 0 faces +Z.
    #[serde(default)]
    pub yaw_deg: f32,
    pub destination: [f32; 3],
    #[serde(default = "default_throttle")]
    pub throttle: f32,
    #[serde(default)]
    pub mode: PilotMode,
    #[serde(default)]
    pub stick: [f32; 3],
    #[serde(default)]
    pub path_hint: Option<PathHint>,
    #[serde(default)]
    pub params: EngineParams,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObstacleDesc {
    pub position: [f32; 3],
    #[serde(default)]
    pub velocity: [f32; 3],
    pub shape: Shape,
    #[serde(default = "default_true")]
    pub dynamic: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Builtin {
    /// One ship cruising to a far waypoint.
    Cruise,
    /// A rock parked on the flight line.
    Rock,
    /// Two ships flying nose to nose.
    HeadOn,
    /// Path following with a banked hint through a field of drifting debris.
    Slalom,
}

pub fn load(path: &Path) -> Result<ScenarioDescriptor> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse scenario {}", path.display()))
}

fn finite3(a: [f32; 3], what: &str) -> Result<Vec3> {
    let v = Vec3::from_array(a);
    if !v.is_finite() { return Err(anyhow!("{what} must be finite, got {a:?}")); }
    Ok(v)
}

/// Check the descriptor and populate a fresh world. Returns the world and the
/// ship ids in descriptor order.
pub fn validate_and_build(sd: &ScenarioDescriptor, record_ledger: bool) -> Result<(World, Vec<BodyId>)> {
    if !(sd.dt > 0.0 && sd.dt <= 1.0) { return Err(anyhow!("dt out of range: {}", sd.dt)); }
    if sd.ships.is_empty() { return Err(anyhow!("scenario has no ships")); }

    let mut world = WorldBuilder::new()
        .with_capacity(sd.ships.len() + sd.obstacles.len())
        .record_ledger(record_ledger)
        .build();

    let mut ships = Vec::with_capacity(sd.ships.len());
    for (i, s) in sd.ships.iter().enumerate() {
        s.params.validate().with_context(|| format!("ship[{i}].params"))?;
        let pos = finite3(s.position, "ship position").with_context(|| format!("ship[{i}]"))?;
        let dest = finite3(s.destination, "ship destination").with_context(|| format!("ship[{i}]"))?;
        if !s.yaw_deg.is_finite() { return Err(anyhow!("ship[{i}].yaw_deg must be finite")); }

        let mut controls = FlightControls::new(dest);
        controls.mode = s.mode;
        controls.set_throttle(s.throttle);
        controls.set_stick(s.stick[0], s.stick[1], s.stick[2]);
        controls.path_hint = s.path_hint;

        let rot = Quat::from_rotation_y(s.yaw_deg.to_radians());
        ships.push(world.add_ship(iso(pos, rot), Velocity::default(), s.params, controls));
    }

    for (i, o) in sd.obstacles.iter().enumerate() {
        let pos = finite3(o.position, "obstacle position").with_context(|| format!("obstacle[{i}]"))?;
        let vel = finite3(o.velocity, "obstacle velocity").with_context(|| format!("obstacle[{i}]"))?;
        let r = o.shape.bounding_radius();
        if !r.is_finite() || r <= 0.0 {
            return Err(anyhow!("obstacle[{i}] has an empty shape"));
        }
        world.add_obstacle(iso(pos, Quat::IDENTITY), Velocity { lin: vel, ang: Vec3::ZERO }, o.shape, o.dynamic);
    }

    Ok((world, ships))
}

fn ship(position: [f32; 3], yaw_deg: f32, destination: [f32; 3]) -> ShipDesc {
    ShipDesc {
        position,
        yaw_deg,
        destination,
        throttle: 1.0,
        mode: PilotMode::Autopilot,
        stick: [0.0; 3],
        path_hint: None,
        params: EngineParams::default(),
    }
}

pub fn builtin(which: Builtin) -> ScenarioDescriptor {
    match which {
        Builtin::Cruise => ScenarioDescriptor {
            dt: 0.02,
            ticks: 500,
            ships: vec![ship([0.0, 0.0, 0.0], 0.0, [0.0, 0.0, 100.0])],
            obstacles: Vec::new(),
        },
        Builtin::Rock => ScenarioDescriptor {
            dt: 0.02,
            ticks: 800,
            ships: vec![ship([0.0, 0.0, 0.0], 0.0, [0.0, 0.0, 120.0])],
            obstacles: vec![ObstacleDesc {
                position: [0.5, 0.0, 40.0],
                velocity: [0.0; 3],
                shape: Shape::Sphere { r: 3.0 },
                dynamic: false,
            }],
        },
        Builtin::HeadOn => ScenarioDescriptor {
            dt: 0.02,
            ticks: 600,
            ships: vec![
                ship([0.0, 0.0, 0.0], 0.0, [0.0, 0.0, 150.0]),
                ship([0.0, 0.0, 60.0], 180.0, [0.0, 0.0, -90.0]),
            ],
            obstacles: Vec::new(),
        },
        Builtin::Slalom => {
            let mut pilot = ship([0.0, 0.0, 0.0], 0.0, [0.0, 0.0, 200.0]);
            pilot.mode = PilotMode::FollowPath;
            pilot.path_hint = Some(PathHint { roll_deg: Some(20.0), throttle: Some(0.6) });
            let mut wingman = ship([6.0, 0.0, -10.0], 0.0, [6.0, 0.0, 200.0]);
            wingman.params.steering = SteeringStrategy::Precise;
            let obstacles = (0..6)
                .map(|i| ObstacleDesc {
                    position: [if i % 2 == 0 { 3.0 } else { -3.0 }, 0.0, 30.0 + 25.0 * i as f32],
                    velocity: [if i % 2 == 0 { -0.5 } else { 0.5 }, 0.0, 0.0],
                    shape: if i % 3 == 0 {
                        Shape::Box { hx: 1.0, hy: 1.0, hz: 1.0 }
                    } else {
                        Shape::Capsule { r: 0.75, hh: 1.0 }
                    },
                    dynamic: true,
                })
                .collect();
            ScenarioDescriptor { dt: 0.02, ticks: 1200, ships: vec![pilot, wingman], obstacles }
        }
    }
}
