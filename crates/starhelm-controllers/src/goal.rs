use starhelm_core::{Scalar, Vec3};

/// Goal speeds below this snap to zero.
pub const MIN_GOAL_SPEED: Scalar = 0.25;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GoalVelocity {
    /// Unit vector toward the destination; zero when already there.
    pub direction: Vec3,
    pub speed: Scalar,
    pub distance: Scalar,
    /// Angle between the current forward axis and `direction` (rad).
    pub angle: Scalar,
}

impl GoalVelocity {
    #[inline] pub fn velocity(&self) -> Vec3 { self.direction * self.speed }
}

/// Speed the body should hold toward `destination`.
///
/// Scales with turn rate and remaining distance, and grows as the heading
/// error opens (the `1/cos` term diverges near 90 degrees; the final clamp
/// bounds it). Order: raw, abs, snap below [`MIN_GOAL_SPEED`], clamp.
pub fn resolve_goal_velocity(
    position: Vec3,
    forward: Vec3,
    destination: Vec3,
    turn_rate_rad: Scalar,
    arrival_scale: Scalar,
    max_speed: Scalar,
) -> GoalVelocity {
    let to_dest = destination - position;
    let distance = to_dest.length();
    let direction = to_dest.normalize_or_zero();
    if direction == Vec3::ZERO {
        return GoalVelocity { direction, speed: 0.0, distance, angle: 0.0 };
    }

    let angle = forward.angle_between(direction);
    let raw = turn_rate_rad * (distance * arrival_scale) / angle.cos();
    let mut speed = raw.abs();
    if speed.is_nan() { speed = 0.0; }
    if speed < MIN_GOAL_SPEED { speed = 0.0; }
    let speed = speed.clamp(0.0, max_speed.max(0.0));

    GoalVelocity { direction, speed, distance, angle: if angle.is_finite() { angle } else { 0.0 } }
}
