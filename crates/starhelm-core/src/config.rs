use serde::{Deserialize, Serialize};
use crate::error::{ParamsError, ParamsResult};
use crate::Scalar;

/// How the autopilot turns the hull toward its desired direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringStrategy {
    /// Bang-bang far from the target, motion profile inside the quarter-turn radius.
    #[default]
    Profiled,
    /// Motion profile on every axis regardless of error size, yaw rate halved.
    Precise,
    /// Step the axis rate toward the angular error and clamp it there.
    StepClamp,
}

/// How throttle becomes linear motion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionStrategy {
    /// Thrust along the nose plus the slip alignment term.
    #[default]
    Force,
    /// Ramp the forward speed directly.
    Velocity,
}

/// Per-hull tuning. Plain numbers supplied by the host at construction time;
/// the control law itself never validates them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Speed cap (m/s); also the avoidance force cap.
    pub max_speed: Scalar,
    /// Fraction of `max_speed` gained per second by the velocity ramp.
    pub acceleration_rate: Scalar,
    /// Angular rate cap per axis (deg/s).
    pub turn_rate_deg: Scalar,
    /// Near-field motion profile acceleration (rad/s^2).
    pub angular_acceleration: Scalar,
    /// Lower values spend more time decelerating into the destination.
    pub arrival_deceleration_scale: Scalar,
    /// Radius of the obstacle query sphere (m).
    pub detection_range: Scalar,
    /// Collisions further away in time than this (s) are ignored.
    pub horizon: Scalar,
    /// Strength of the velocity-to-heading alignment.
    pub slip: Scalar,
    /// Collision radius of the hull (m).
    pub radius: Scalar,
    pub steering: SteeringStrategy,
    pub propulsion: PropulsionStrategy,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            acceleration_rate: 0.25,
            turn_rate_deg: 90.0,
            angular_acceleration: 0.5,
            arrival_deceleration_scale: 0.25,
            detection_range: 10.0,
            horizon: 5.0,
            slip: 0.75,
            radius: 1.0,
            steering: SteeringStrategy::default(),
            propulsion: PropulsionStrategy::default(),
        }
    }
}

impl EngineParams {
    #[inline] pub fn turn_rate_rad(&self) -> Scalar { self.turn_rate_deg.to_radians() }

    /// Parse and validate a JSON object; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> ParamsResult<Self> {
        let p: Self = serde_json::from_str(s)?;
        p.validate()?;
        Ok(p)
    }

    /// Loader-side sanity check. The controllers clamp defensively either way.
    pub fn validate(&self) -> ParamsResult<()> {
        let fields = [
            ("max_speed", self.max_speed),
            ("acceleration_rate", self.acceleration_rate),
            ("turn_rate_deg", self.turn_rate_deg),
            ("angular_acceleration", self.angular_acceleration),
            ("arrival_deceleration_scale", self.arrival_deceleration_scale),
            ("detection_range", self.detection_range),
            ("horizon", self.horizon),
            ("slip", self.slip),
            ("radius", self.radius),
        ];
        for (field, value) in fields {
            if !value.is_finite() { return Err(ParamsError::NonFinite { field, value }); }
        }
        for (field, value) in [("max_speed", self.max_speed), ("turn_rate_deg", self.turn_rate_deg), ("horizon", self.horizon)] {
            if value <= 0.0 { return Err(ParamsError::NonPositive { field, value }); }
        }
        for (field, value) in fields {
            if value < 0.0 { return Err(ParamsError::Negative { field, value }); }
        }
        Ok(())
    }
}
