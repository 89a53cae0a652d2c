use starhelm_core::Scalar;
use starhelm_core::math::clamp_abs;

/// Deceleration slack above which the target would be overrun.
const OVERSHOOT_K: Scalar = 1.05;
/// Below this fraction of the braking distance there is room to speed up.
const UNDERSHOOT_K: Scalar = 0.95;
const REST_EPS: Scalar = 1.0e-5;
/// approach -> away -> approach is the deepest chain one step can produce.
const MAX_DEPTH: u8 = 4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProfileLimits {
    pub max_velocity: Scalar,
    pub max_acceleration: Scalar,
}

impl ProfileLimits {
    pub fn new(max_velocity: Scalar, max_acceleration: Scalar) -> Self {
        Self { max_velocity, max_acceleration }
    }
}

/// Next velocity for a body moving toward a target `distance >= 0` ahead with
/// `velocity >= 0`. With `no_overshoot` the result never carries it past the target.
pub fn approach(velocity: Scalar, distance: Scalar, lim: ProfileLimits, dt: Scalar, no_overshoot: bool) -> Scalar {
    clamp_abs(approach_at(velocity, distance, lim, dt, no_overshoot, 0), lim.max_velocity)
}

/// Next velocity for a body with `velocity < 0` (moving away) from a target
/// `distance >= 0` ahead: brake to rest, then approach with whatever time is left.
pub fn away(velocity: Scalar, distance: Scalar, lim: ProfileLimits, dt: Scalar, no_overshoot: bool) -> Scalar {
    clamp_abs(away_at(velocity, distance, lim, dt, no_overshoot, 0), lim.max_velocity)
}

/// Signed dispatcher: close `error` starting from `velocity`. Negative errors
/// are mirrored into the positive frame; a zero error stops the axis.
pub fn toward(error: Scalar, velocity: Scalar, lim: ProfileLimits, dt: Scalar, no_overshoot: bool) -> Scalar {
    if error > 0.0 {
        if velocity >= 0.0 {
            approach(velocity, error, lim, dt, no_overshoot)
        } else {
            away(velocity, error, lim, dt, no_overshoot)
        }
    } else if error < 0.0 {
        if velocity <= 0.0 {
            -approach(-velocity, -error, lim, dt, no_overshoot)
        } else {
            -away(-velocity, -error, lim, dt, no_overshoot)
        }
    } else {
        0.0
    }
}

fn away_at(v: Scalar, d: Scalar, lim: ProfileLimits, dt: Scalar, no_overshoot: bool, depth: u8) -> Scalar {
    let a = lim.max_acceleration;
    if v.abs() < REST_EPS && d.abs() < REST_EPS { return v; }
    if a == 0.0 || depth > MAX_DEPTH { return v; }

    // time until the rate crosses zero
    let t0 = -v / a;
    if t0 > dt {
        return v + a * dt;
    }

    // ground lost while braking is added back to the distance
    let d = d - 0.5 * v * t0;
    approach_at(0.0, d, lim, dt - t0, no_overshoot, depth + 1)
}

fn approach_at(v: Scalar, d: Scalar, lim: ProfileLimits, dt: Scalar, no_overshoot: bool, depth: u8) -> Scalar {
    let a = lim.max_acceleration;
    if v.abs() < REST_EPS && d.abs() < REST_EPS { return v; }
    if a == 0.0 || depth > MAX_DEPTH { return v; }

    let mut v = v;
    if no_overshoot && v * v > 2.0 * OVERSHOOT_K * a * d {
        v = (2.0 * a * d).max(0.0).sqrt();
    }
    let v2 = v * v;

    if v2 > 2.0 * OVERSHOOT_K * a * d {
        let a_eff = OVERSHOOT_K * a;
        let swept = v * dt - 0.5 * a_eff * dt * dt;

        if swept > d {
            // crosses the target inside this step: brake to it, then bounce back
            let t_goal = ((-v + (v2 + 2.0 * a_eff * d).max(0.0).sqrt()) / a_eff).clamp(0.0, dt);
            let v_goal = v - a_eff * t_goal;
            return -away_at(-v_goal, 0.0, lim, dt - t_goal, no_overshoot, depth + 1);
        }
        if swept < 0.0 {
            // already stopped short of passing it; hold
            return 0.0;
        }
        return v - a_eff * dt;
    }

    if v2 < 2.0 * UNDERSHOOT_K * a * d {
        let peak_sq = a * d + 0.5 * v2;
        let v_max = lim.max_velocity;

        if peak_sq > v_max * v_max {
            let t_cap = (v_max - v) / a;
            if t_cap < 0.0 {
                // entered above the cap: brake, but not below it
                return (v - a * dt).max(v_max);
            }
            if t_cap > dt {
                return v + a * dt;
            }
            return v_max;
        }

        let v_end = v + a * dt;
        if peak_sq > v_end * v_end {
            return v_end;
        }
        // peak reached mid-step: accelerate to it, spend the rest braking
        let peak = peak_sq.sqrt();
        let t_peak = (peak - v) / a;
        return (peak - a * (dt - t_peak)).max(0.0);
    }

    // on the braking curve
    let v_next = v - a * dt;
    if v_next < 0.0 { 0.0 } else { v_next }
}
