use starhelm_collision::{avoidance_force, gather_possible_collisions, PossibleCollision};
use starhelm_controllers::{
    axis_errors, axis_errors_banked, resolve_goal_velocity, GoalVelocity, SteeringCtrl, SteeringParams,
};
use starhelm_core::{
    EngineParams, FlightBody, Obstacle, ObstacleSource, PropulsionStrategy, Scalar, StepCtx,
    SteeringStrategy, Vec3,
};
use starhelm_propulsion::{PropulsionCtrl, PropulsionParams};
use tracing::{debug, warn};

use crate::controls::{FlightControls, PilotMode};

/// What one tick decided, for telemetry and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FlightReport {
    pub tick: u64,
    pub mode: PilotMode,
    /// The body state was non-finite and nothing was written.
    pub skipped: bool,
    pub collisions: usize,
    pub avoidance: Vec3,
    pub goal: GoalVelocity,
    /// Unit heading handed to the steering controller (zero in manual mode).
    pub desired_direction: Vec3,
    pub angular_velocity: Vec3,
    pub throttle: Scalar,
    pub speed: Scalar,
}

/// Steering, avoidance and propulsion for one hull.
///
/// Holds only tuning, controls and reusable scratch buffers; all per-tick
/// values are rebuilt from the body state every call.
pub struct EngineSystem {
    params: EngineParams,
    pub controls: FlightControls,
    steering: SteeringCtrl,
    propulsion: PropulsionCtrl,
    scratch: Vec<Obstacle>,
    collisions: Vec<PossibleCollision>,
    speed: Scalar,
}

impl EngineSystem {
    pub fn new(params: EngineParams) -> Self {
        Self {
            params,
            controls: FlightControls::default(),
            steering: SteeringCtrl::new(SteeringParams::from_engine(&params)),
            propulsion: PropulsionCtrl::new(PropulsionParams::from_engine(&params)),
            scratch: Vec::new(),
            collisions: Vec::new(),
            speed: 0.0,
        }
    }

    pub fn with_controls(mut self, controls: FlightControls) -> Self {
        self.controls = controls;
        self
    }

    #[inline] pub fn params(&self) -> &EngineParams { &self.params }

    /// Speed written to the body by the last completed tick.
    #[inline] pub fn speed(&self) -> Scalar { self.speed }

    /// Encounters gathered by the last autopilot tick.
    #[inline] pub fn possible_collisions(&self) -> &[PossibleCollision] { &self.collisions }

    /// Run one fixed tick: read the body, decide, write angular and linear
    /// velocity back. Thrust requested through `add_acceleration` lands on
    /// the host's next velocity integration.
    pub fn step<B, S>(&mut self, ctx: StepCtx, body: &mut B, obstacles: &S) -> FlightReport
    where
        B: FlightBody + ?Sized,
        S: ObstacleSource + ?Sized,
    {
        let mut report = FlightReport { tick: ctx.tick, mode: self.controls.mode, ..FlightReport::default() };
        self.collisions.clear();

        if !body.state_is_finite() || !ctx.dt.is_finite() {
            warn!(body = %body.id(), tick = ctx.tick, "non-finite body state, skipping tick");
            report.skipped = true;
            return report;
        }

        match self.controls.mode {
            PilotMode::Manual => self.fly_manual(ctx, body, &mut report),
            PilotMode::Autopilot => self.fly_autopilot(ctx, body, obstacles, &mut report),
            PilotMode::FollowPath => self.fly_path(ctx, body, &mut report),
        }

        self.speed = report.speed;
        report
    }

    fn fly_manual<B: FlightBody + ?Sized>(&mut self, ctx: StepCtx, body: &mut B, report: &mut FlightReport) {
        let w = self.steering.steer_manual(body.rotation(), body.angular_velocity(), self.controls.stick(), ctx.dt);
        body.set_angular_velocity(w);

        let throttle = self.controls.throttle();
        report.angular_velocity = w;
        report.throttle = throttle;
        report.speed = self.propulsion.apply_with(PropulsionStrategy::Force, body, throttle, ctx.dt);
    }

    fn fly_autopilot<B, S>(&mut self, ctx: StepCtx, body: &mut B, obstacles: &S, report: &mut FlightReport)
    where
        B: FlightBody + ?Sized,
        S: ObstacleSource + ?Sized,
    {
        let p = &self.params;
        let pos = body.position();
        let vel = body.linear_velocity();
        let fwd = body.forward();

        gather_possible_collisions(
            obstacles,
            body.id(),
            pos,
            vel,
            p.radius,
            p.detection_range,
            p.horizon,
            &mut self.scratch,
            &mut self.collisions,
        );
        let avoidance = avoidance_force(pos, vel, &self.collisions, p.horizon, p.max_speed);
        if !self.collisions.is_empty() {
            debug!(body = %body.id(), tick = ctx.tick, count = self.collisions.len(), ?avoidance, "possible collisions");
        }

        let goal = resolve_goal_velocity(
            pos,
            fwd,
            self.controls.destination,
            p.turn_rate_rad(),
            p.arrival_deceleration_scale,
            p.max_speed,
        );
        let dir = (goal.velocity() + avoidance)
            .try_normalize()
            .or_else(|| goal.direction.try_normalize())
            .unwrap_or(fwd);

        let w = self.steering.steer(body.rotation(), body.angular_velocity(), dir, ctx.dt);
        body.set_angular_velocity(w);

        let throttle = if p.max_speed > 0.0 {
            self.controls.throttle().min(goal.speed / p.max_speed)
        } else {
            0.0
        };
        let speed = self.propulsion.apply(body, throttle, ctx.dt);

        report.collisions = self.collisions.len();
        report.avoidance = avoidance;
        report.goal = goal;
        report.desired_direction = dir;
        report.angular_velocity = w;
        report.throttle = throttle;
        report.speed = speed;
    }

    fn fly_path<B: FlightBody + ?Sized>(&mut self, ctx: StepCtx, body: &mut B, report: &mut FlightReport) {
        let rot = body.rotation();
        let dir = (self.controls.destination - body.position()).try_normalize().unwrap_or_else(|| body.forward());
        let err = match self.controls.path_roll_deg() {
            Some(bank) => axis_errors_banked(rot, dir, bank),
            None => axis_errors(rot, dir),
        };
        let w = self.steering.steer_errors(SteeringStrategy::StepClamp, rot, body.angular_velocity(), err, ctx.dt);
        body.set_angular_velocity(w);

        let throttle = self.controls.path_throttle();
        report.desired_direction = dir;
        report.angular_velocity = w;
        report.throttle = throttle;
        report.speed = self.propulsion.apply_with(PropulsionStrategy::Velocity, body, throttle, ctx.dt);
    }
}
