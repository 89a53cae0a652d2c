pub mod aabb;
pub mod shape;

pub use aabb::Aabb;
pub use shape::{Shape, aabb_of};
