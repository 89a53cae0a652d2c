use glam::Mat3;
use serde::{Deserialize, Serialize};
use starhelm_core::{Isometry, Scalar, Vec3};
use crate::aabb::Aabb;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Sphere { r: Scalar },
    Box { hx: Scalar, hy: Scalar, hz: Scalar },
    Capsule { r: Scalar, hh: Scalar }, // half-height along local Y
}

impl Shape {
    /// Radius of the smallest origin-centred sphere enclosing the shape.
    /// This is the radius the collision predictor sees.
    pub fn bounding_radius(&self) -> Scalar {
        match *self {
            Shape::Sphere { r } => r.abs(),
            Shape::Box { hx, hy, hz } => Vec3::new(hx, hy, hz).length(),
            Shape::Capsule { r, hh } => r.abs() + hh.abs(),
        }
    }
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { r } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(r.abs())),
        Shape::Box { hx, hy, hz } => {
            let he = Vec3::new(hx, hy, hz).abs();
            let rot = Mat3::from_quat(xf.rot);
            let m = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            Aabb::from_center_half_extents(xf.pos, m * he)
        }
        Shape::Capsule { r, hh } => {
            let axis_world = xf.rot * Vec3::Y * hh.abs();
            let he = axis_world.abs() + Vec3::splat(r.abs());
            Aabb::from_center_half_extents(xf.pos, he)
        }
    }
}
