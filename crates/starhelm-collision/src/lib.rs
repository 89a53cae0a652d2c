//! Collision anticipation for steered bodies.
//!
//! * [`time_to_collision`]: closed-form first-contact time of two moving spheres.
//! * [`ObstacleSnapshot`]: x-sorted, immutable per-tick copy of the colliders,
//!   answering sphere queries as an [`ObstacleSource`](starhelm_core::ObstacleSource).
//! * [`gather_possible_collisions`] and [`avoidance_force`]: the repulsive field
//!   that bends the desired heading away from what is about to be hit.

pub mod predict;
pub mod query;
pub mod field;

pub use predict::time_to_collision;
pub use query::ObstacleSnapshot;
pub use field::{PossibleCollision, gather_possible_collisions, avoidance_force};
