use starhelm_core::{BodyId, Obstacle, ObstacleSource, Scalar, Vec3};
use tracing::trace;
use crate::predict::time_to_collision;

/// Keeps the urgency finite as `tau` approaches zero.
const URGENCY_EPS: Scalar = 0.001;

/// One predicted encounter inside the horizon, recomputed every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PossibleCollision {
    pub obstacle: BodyId,
    pub radius: Scalar,
    pub time_to_impact: Scalar,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Query `source` around `position` and keep every obstacle whose predicted
/// impact falls in `[0, horizon)`. `scratch` is cleared and reused; `out` is
/// cleared before being filled.
#[allow(clippy::too_many_arguments)]
pub fn gather_possible_collisions<S: ObstacleSource + ?Sized>(
    source: &S,
    me: BodyId,
    position: Vec3,
    velocity: Vec3,
    radius: Scalar,
    detection_range: Scalar,
    horizon: Scalar,
    scratch: &mut Vec<Obstacle>,
    out: &mut Vec<PossibleCollision>,
) {
    scratch.clear();
    out.clear();
    source.query_sphere(position, detection_range, me, scratch);

    for o in scratch.iter() {
        if o.id == me { continue; }
        let Some(tau) = time_to_collision(position, velocity, radius, o.position, o.velocity, o.radius) else {
            continue;
        };
        if tau >= horizon { continue; }
        trace!(body = %me, obstacle = %o.id, tau, "possible collision");
        out.push(PossibleCollision {
            obstacle: o.id,
            radius: o.radius,
            time_to_impact: tau,
            position: o.position,
            velocity: o.velocity,
        });
    }
}

/// Sum of the repulsion from every gathered encounter, clamped to `max_speed`.
///
/// Overlaps push straight away from the obstacle centre, undamped. Future
/// impacts push along the separation of the two extrapolated centres at `tau`
/// with urgency `(horizon - tau) / (tau + eps)`.
pub fn avoidance_force(
    position: Vec3,
    velocity: Vec3,
    collisions: &[PossibleCollision],
    horizon: Scalar,
    max_speed: Scalar,
) -> Vec3 {
    let mut force = Vec3::ZERO;
    for c in collisions {
        let tau = c.time_to_impact;
        if tau == 0.0 {
            force += position - c.position;
            continue;
        }
        let here = position + velocity * tau;
        let there = c.position + c.velocity * tau;
        let dir = (here - there).normalize_or_zero();
        let urgency = ((horizon - tau) / (tau + URGENCY_EPS)).max(0.0);
        force += dir * urgency;
    }
    if !force.is_finite() {
        return Vec3::ZERO;
    }
    force.clamp_length_max(max_speed.max(0.0))
}
