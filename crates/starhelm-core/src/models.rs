//! Contracts between the controller and its two collaborators: the physics
//! host that owns body state, and the spatial query that enumerates obstacles.
use glam::Quat;
use crate::{BodyId, Scalar, Vec3};

/// Read/command surface of one simulated rigid body.
///
/// Angular velocity is exchanged in world space; controllers decompose it into
/// body-local pitch (x), yaw (y) and roll (z) themselves.
pub trait FlightBody {
    fn id(&self) -> BodyId;
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, v: Vec3);
    fn set_angular_velocity(&mut self, w: Vec3);
    /// Mass-independent acceleration, integrated by the host on its next step.
    fn add_acceleration(&mut self, a: Vec3);

    #[inline] fn forward(&self) -> Vec3 { self.rotation() * Vec3::Z }
    #[inline] fn to_local(&self, dir_world: Vec3) -> Vec3 { self.rotation().inverse() * dir_world }

    fn state_is_finite(&self) -> bool {
        self.position().is_finite()
            && self.rotation().is_finite()
            && self.linear_velocity().is_finite()
            && self.angular_velocity().is_finite()
    }
}

/// Read-only view of a nearby collider for one tick. Static geometry reports zero velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: BodyId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: Scalar,
}

/// Spatial query collaborator.
pub trait ObstacleSource {
    /// Append every obstacle whose bounds touch the sphere `(center, range)`,
    /// skipping `exclude`. Implementations must not clear `out`.
    fn query_sphere(&self, center: Vec3, range: Scalar, exclude: BodyId, out: &mut Vec<Obstacle>);
}

impl ObstacleSource for [Obstacle] {
    fn query_sphere(&self, center: Vec3, range: Scalar, exclude: BodyId, out: &mut Vec<Obstacle>) {
        for o in self {
            if o.id == exclude { continue; }
            let reach = range + o.radius;
            if o.position.distance_squared(center) <= reach * reach {
                out.push(*o);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_query_excludes_self_and_far_bodies() {
        let obstacles = [
            Obstacle { id: BodyId(0), position: Vec3::ZERO, velocity: Vec3::ZERO, radius: 1.0 },
            Obstacle { id: BodyId(1), position: Vec3::new(0.0, 0.0, 10.5), velocity: Vec3::ZERO, radius: 1.0 },
            Obstacle { id: BodyId(2), position: Vec3::new(0.0, 0.0, 12.0), velocity: Vec3::ZERO, radius: 1.0 },
        ];
        let mut out = Vec::new();
        obstacles[..].query_sphere(Vec3::ZERO, 10.0, BodyId(0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, BodyId(1));
    }
}
