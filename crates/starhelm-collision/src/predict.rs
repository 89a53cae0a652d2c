use starhelm_core::{Scalar, Vec3};

const REL_SPEED_EPS_SQ: Scalar = 1.0e-12;

/// Earliest `tau >= 0` at which two spheres moving at constant velocity touch.
///
/// Returns `Some(0.0)` when they already overlap and `None` when they never
/// meet in the future (separating, parallel, or no relative motion).
pub fn time_to_collision(
    position: Vec3,
    velocity: Vec3,
    radius: Scalar,
    other_position: Vec3,
    other_velocity: Vec3,
    other_radius: Scalar,
) -> Option<Scalar> {
    let r = radius + other_radius;
    let w = other_position - position;
    let c = w.dot(w) - r * r;
    if c <= 0.0 {
        return Some(0.0);
    }

    let rel = velocity - other_velocity;
    let a = rel.dot(rel);
    if a <= REL_SPEED_EPS_SQ {
        return None;
    }
    let b = w.dot(rel);
    if b <= 0.0 {
        return None;
    }
    let discr = b * b - a * c;
    if discr <= 0.0 {
        return None;
    }

    // (b - sqrt(discr)) / a without the cancellation; c > 0 keeps it positive
    let tau = c / (b + discr.sqrt());
    if tau.is_finite() { Some(tau) } else { None }
}
