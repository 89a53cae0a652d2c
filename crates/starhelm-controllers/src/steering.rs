use glam::Quat;
use starhelm_core::math::{clamp_abs, sign, wrap_180, wrap_pi};
use starhelm_core::{EngineParams, Scalar, SteeringStrategy, Vec3};
use starhelm_profile::{toward, ProfileLimits};
use tracing::trace;

/// Raw pilot input, one value per body axis. Written clamped to `[-1, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StickInput {
    pub pitch: Scalar,
    pub yaw: Scalar,
    pub roll: Scalar,
}

impl StickInput {
    pub fn new(pitch: Scalar, yaw: Scalar, roll: Scalar) -> Self {
        Self { pitch, yaw, roll }.clamped()
    }

    pub fn clamped(self) -> Self {
        let c = |v: Scalar| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self { pitch: c(self.pitch), yaw: c(self.yaw), roll: c(self.roll) }
    }

    #[inline] fn as_local(&self) -> Vec3 { Vec3::new(self.pitch, self.yaw, self.roll) }
}

#[derive(Copy, Clone, Debug)]
pub struct SteeringParams {
    pub turn_rate_rad: Scalar,       // per-axis rate cap (rad/s)
    pub angular_acceleration: Scalar, // near-field profile acceleration (rad/s^2)
    pub strategy: SteeringStrategy,
}

impl SteeringParams {
    pub fn from_engine(p: &EngineParams) -> Self {
        Self {
            turn_rate_rad: p.turn_rate_rad(),
            angular_acceleration: p.angular_acceleration,
            strategy: p.steering,
        }
    }
}

impl Default for SteeringParams {
    fn default() -> Self { Self::from_engine(&EngineParams::default()) }
}

/// Signed heading errors in the body frame (rad).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AxisErrors {
    pub pitch: Scalar,
    pub yaw: Scalar,
    pub roll: Scalar,
}

/// Bank of the body about its forward axis relative to the horizon (rad).
/// Zero when the forward axis is vertical and the horizon is undefined.
pub fn roll_angle(rot: Quat) -> Scalar {
    let fwd = rot * Vec3::Z;
    let flat = Vec3::new(fwd.x, 0.0, fwd.z);
    if flat.length_squared() <= 1.0e-12 {
        return 0.0;
    }
    let flat_right = Vec3::Y.cross(flat.normalize());
    let local = rot.inverse() * flat_right;
    local.y.atan2(local.x)
}

/// Heading errors that would point local `+Z` along `dir_world`, with the roll
/// error banking into the yaw turn.
pub fn axis_errors(rot: Quat, dir_world: Vec3) -> AxisErrors {
    let local = rot.inverse() * dir_world;
    let yaw = local.x.atan2(local.z);
    let pitch = -local.y.atan2(local.z);
    let roll = wrap_pi(-yaw + roll_angle(rot));
    AxisErrors { pitch, yaw, roll }
}

/// Like [`axis_errors`], but hold a commanded bank of `bank_deg` instead of
/// banking into the yaw turn.
pub fn axis_errors_banked(rot: Quat, dir_world: Vec3, bank_deg: Scalar) -> AxisErrors {
    let mut err = axis_errors(rot, dir_world);
    err.roll = wrap_pi(wrap_180(bank_deg).to_radians() + roll_angle(rot));
    err
}

/// Orientation controller. Works in the body frame, returns world-space
/// angular velocity with every local axis clamped to the turn rate.
#[derive(Copy, Clone, Debug, Default)]
pub struct SteeringCtrl {
    pub params: SteeringParams,
}

impl SteeringCtrl {
    pub fn new(params: SteeringParams) -> Self { Self { params } }

    /// Steer toward `dir_world` with the configured strategy.
    pub fn steer(&self, rot: Quat, ang_world: Vec3, dir_world: Vec3, dt: Scalar) -> Vec3 {
        self.steer_with(self.params.strategy, rot, ang_world, dir_world, dt)
    }

    pub fn steer_with(
        &self,
        strategy: SteeringStrategy,
        rot: Quat,
        ang_world: Vec3,
        dir_world: Vec3,
        dt: Scalar,
    ) -> Vec3 {
        self.steer_errors(strategy, rot, ang_world, axis_errors(rot, dir_world), dt)
    }

    /// Drive precomputed heading errors to zero.
    pub fn steer_errors(
        &self,
        strategy: SteeringStrategy,
        rot: Quat,
        ang_world: Vec3,
        err: AxisErrors,
        dt: Scalar,
    ) -> Vec3 {
        let av = rot.inverse() * ang_world;
        let tr = self.params.turn_rate_rad;

        let local = match strategy {
            SteeringStrategy::Profiled => Vec3::new(
                self.profiled_axis(err.pitch, av.x, tr, dt),
                self.profiled_axis(err.yaw, av.y, tr, dt),
                self.profiled_axis(err.roll, av.z, tr, dt),
            ),
            SteeringStrategy::Precise => {
                let lim = ProfileLimits::new(tr, self.params.angular_acceleration);
                let yaw_lim = ProfileLimits::new(tr * 0.5, self.params.angular_acceleration);
                Vec3::new(
                    toward(err.pitch, av.x, lim, dt, true),
                    toward(err.yaw, av.y, yaw_lim, dt, true),
                    toward(err.roll, av.z, lim, dt, true),
                )
            }
            SteeringStrategy::StepClamp => Vec3::new(
                step_clamp_axis(err.pitch, av.x, tr, dt),
                step_clamp_axis(err.yaw, av.y, tr, dt),
                step_clamp_axis(err.roll, av.z, tr, dt),
            ),
        };

        let local = clamp_local(local, tr);
        trace!(
            ?strategy,
            pitch_err = err.pitch, yaw_err = err.yaw, roll_err = err.roll,
            wx = local.x, wy = local.y, wz = local.z,
            "steer"
        );
        rot * local
    }

    /// Direct stick control: each axis nudged by `stick * turn_rate * dt`.
    pub fn steer_manual(&self, rot: Quat, ang_world: Vec3, stick: StickInput, dt: Scalar) -> Vec3 {
        let tr = self.params.turn_rate_rad;
        let av = rot.inverse() * ang_world;
        let local = clamp_local(av + stick.clamped().as_local() * tr * dt, tr);
        rot * local
    }

    // Far field: constant-sign bang at the turn rate. Near field: profile.
    fn profiled_axis(&self, err: Scalar, av: Scalar, tr: Scalar, dt: Scalar) -> Scalar {
        let quarter_turn = 2.0 * tr;
        if err.abs() < quarter_turn {
            toward(err, av, ProfileLimits::new(tr, self.params.angular_acceleration), dt, false)
        } else {
            av + sign(err) * tr * dt
        }
    }
}

fn step_clamp_axis(err: Scalar, av: Scalar, tr: Scalar, dt: Scalar) -> Scalar {
    let step = tr * dt;
    if err.abs() >= tr {
        av + sign(err) * step
    } else if err >= av {
        (av + step).min(err)
    } else {
        (av - step).max(err)
    }
}

#[inline]
fn clamp_local(v: Vec3, tr: Scalar) -> Vec3 {
    let c = |x: Scalar| if x.is_finite() { clamp_abs(x, tr) } else { 0.0 };
    Vec3::new(c(v.x), c(v.y), c(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    const DT: Scalar = 0.02;

    fn ctrl(strategy: SteeringStrategy) -> SteeringCtrl {
        SteeringCtrl::new(SteeringParams { turn_rate_rad: FRAC_PI_2, angular_acceleration: 0.5, strategy })
    }

    #[test]
    fn aligned_heading_has_no_error() {
        let e = axis_errors(Quat::IDENTITY, Vec3::Z);
        assert_eq!(e, AxisErrors::default());
        let w = ctrl(SteeringStrategy::Profiled).steer(Quat::IDENTITY, Vec3::ZERO, Vec3::Z, DT);
        assert_eq!(w, Vec3::ZERO);
    }

    #[test]
    fn error_signs_follow_body_axes() {
        // right of the nose: positive yaw, which turns +Z toward +X
        let e = axis_errors(Quat::IDENTITY, Vec3::new(1.0, 0.0, 1.0));
        assert!(e.yaw > 0.0);
        assert!((Quat::from_rotation_y(0.1) * Vec3::Z).x > 0.0);
        // above the nose: negative pitch, since positive pitch drops the nose
        let e = axis_errors(Quat::IDENTITY, Vec3::new(0.0, 1.0, 1.0));
        assert!(e.pitch < 0.0);
        assert!((Quat::from_rotation_x(-0.1) * Vec3::Z).y > 0.0);
    }

    #[test]
    fn roll_angle_tracks_bank_and_degenerates_to_zero() {
        assert_eq!(roll_angle(Quat::IDENTITY), 0.0);
        let banked = Quat::from_rotation_z(0.3);
        assert!((roll_angle(banked) + 0.3).abs() < 1e-5);
        let nose_up = Quat::from_rotation_x(-FRAC_PI_2);
        assert_eq!(roll_angle(nose_up), 0.0);
    }

    #[test]
    fn banked_errors_hold_commanded_roll() {
        let e = axis_errors_banked(Quat::IDENTITY, Vec3::new(1.0, 0.0, 1.0), 30.0);
        assert!((e.roll - 30f32.to_radians()).abs() < 1e-5);
        // already at the commanded bank
        let rolled = Quat::from_rotation_z(0.4);
        let e = axis_errors_banked(rolled, rolled * Vec3::Z, 0.4f32.to_degrees());
        assert!(e.roll.abs() < 1e-5);
        let e = axis_errors_banked(Quat::IDENTITY, Vec3::Z, 390.0);
        assert!((e.roll - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn manual_clamps_every_axis() {
        let c = ctrl(SteeringStrategy::Profiled);
        let mut w = Vec3::ZERO;
        for _ in 0..500 {
            w = c.steer_manual(Quat::IDENTITY, w, StickInput::new(3.0, -1.0, 0.5), DT);
        }
        assert!((w.x - FRAC_PI_2).abs() < 1e-5);
        assert!((w.y + FRAC_PI_2).abs() < 1e-5);
        assert!((w.z - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn stick_is_clamped_on_write() {
        let s = StickInput::new(2.0, -7.0, f32::NAN);
        assert_eq!(s, StickInput { pitch: 1.0, yaw: -1.0, roll: 0.0 });
    }

    #[test]
    fn far_field_steps_at_turn_rate() {
        // behind and to the right: yaw err 3PI/4 is past the 2 * 0.5 rad threshold
        let c = SteeringCtrl::new(SteeringParams {
            turn_rate_rad: 0.5,
            angular_acceleration: 0.5,
            strategy: SteeringStrategy::Profiled,
        });
        let w = c.steer(Quat::IDENTITY, Vec3::ZERO, Vec3::new(1.0, 0.0, -1.0), DT);
        assert!((w.y - 0.5 * DT).abs() < 1e-6);
        assert!((w.z + 0.5 * DT).abs() < 1e-6);
    }

    #[test]
    fn precise_brakes_short_where_profiled_carries_past() {
        // closing a 0.01 rad pitch error at 1 rad/s
        let err = AxisErrors { pitch: 0.01, yaw: 0.0, roll: 0.0 };
        let w0 = Vec3::new(1.0, 0.0, 0.0);

        let precise = ctrl(SteeringStrategy::Precise)
            .steer_errors(SteeringStrategy::Precise, Quat::IDENTITY, w0, err, DT);
        assert!(precise.x >= 0.0 && precise.x * DT <= err.pitch, "precise {}", precise.x);
        assert!((precise.x - 0.09).abs() < 1e-5);

        let profiled = ctrl(SteeringStrategy::Profiled)
            .steer_errors(SteeringStrategy::Profiled, Quat::IDENTITY, w0, err, DT);
        assert!(profiled.x * DT > err.pitch, "profiled {}", profiled.x);
    }

    #[test]
    fn step_clamp_never_passes_the_error() {
        assert!((step_clamp_axis(0.01, 0.0, FRAC_PI_2, DT) - 0.01).abs() < 1e-7);
        assert!((step_clamp_axis(-0.01, 0.0, FRAC_PI_2, DT) + 0.01).abs() < 1e-7);
        assert!((step_clamp_axis(0.5, 0.0, FRAC_PI_2, DT) - FRAC_PI_2 * DT).abs() < 1e-7);
        assert!((step_clamp_axis(3.0, 1.0, FRAC_PI_2, DT) - (1.0 + FRAC_PI_2 * DT)).abs() < 1e-6);
    }

    #[test]
    fn output_is_world_space() {
        // yaw request on a body rolled 90 degrees shows up on a different world axis
        let rot = Quat::from_rotation_z(FRAC_PI_2);
        let c = ctrl(SteeringStrategy::Profiled);
        let w = c.steer_manual(rot, Vec3::ZERO, StickInput::new(0.0, 1.0, 0.0), DT);
        let expected = rot * Vec3::new(0.0, FRAC_PI_2 * DT, 0.0);
        assert!((w - expected).length() < 1e-6);
        assert!(w.x.abs() > 1e-3);
    }
}
