use starhelm_core::{Scalar, Vec3};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb { pub min: Vec3, pub max: Vec3 }

impl Aabb {
    #[inline] pub fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }
    #[inline] pub fn from_center_half_extents(c: Vec3, he: Vec3) -> Self {
        Self { min: c - he, max: c + he }
    }
    /// Squared distance from `p` to the box; zero inside.
    #[inline] pub fn distance_sq_to_point(&self, p: Vec3) -> Scalar {
        let q = p.clamp(self.min, self.max);
        q.distance_squared(p)
    }
    #[inline] pub fn overlaps_sphere(&self, c: Vec3, r: Scalar) -> bool {
        self.distance_sq_to_point(c) <= r * r
    }
    #[inline] pub fn is_finite(&self) -> bool { self.min.is_finite() && self.max.is_finite() }
}
