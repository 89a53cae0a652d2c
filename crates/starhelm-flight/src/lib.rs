//! One hull's flight computer.
//!
//! [`EngineSystem::step`] runs once per fixed tick against a
//! [`FlightBody`](starhelm_core::FlightBody) host and an
//! [`ObstacleSource`](starhelm_core::ObstacleSource) snapshot. Upstream
//! navigation talks to it only through [`FlightControls`].

mod controls;
mod engine;

pub use controls::{FlightControls, PathHint, PilotMode};
pub use engine::{EngineSystem, FlightReport};
