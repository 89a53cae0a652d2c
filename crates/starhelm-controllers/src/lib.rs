mod goal;
mod steering;

pub use goal::{GoalVelocity, resolve_goal_velocity, MIN_GOAL_SPEED};
pub use steering::{AxisErrors, SteeringCtrl, SteeringParams, StickInput, axis_errors, axis_errors_banked, roll_angle};
