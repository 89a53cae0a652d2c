use glam::Quat;
use crate::Scalar;

pub type Vec3 = glam::Vec3;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Isometry {
    /// Body forward axis (local +Z) in world space.
    #[inline] pub fn forward(&self) -> Vec3 { self.rot * Vec3::Z }
    #[inline] pub fn to_local(&self, dir_world: Vec3) -> Vec3 { self.rot.inverse() * dir_world }
}

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

/// Linear and angular velocity, both in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

impl Velocity {
    #[inline] pub fn is_finite(&self) -> bool { self.lin.is_finite() && self.ang.is_finite() }
}
