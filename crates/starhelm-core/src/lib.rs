pub mod scalar;
pub mod ids;
pub mod types;
pub mod math;
pub mod hash;
pub mod step_ctx;
pub mod models;
pub mod config;
pub mod error;

pub use scalar::Scalar;
pub use ids::BodyId;
pub use types::{Vec3, Isometry, Velocity, vec3, iso};
pub use hash::{StepHasher, hash_vec3, hash_quat, digest_hex};
pub use step_ctx::StepCtx;
pub use models::{FlightBody, Obstacle, ObstacleSource};
pub use config::{EngineParams, SteeringStrategy, PropulsionStrategy};
pub use error::{ParamsError, ParamsResult};
pub use glam::Quat;
