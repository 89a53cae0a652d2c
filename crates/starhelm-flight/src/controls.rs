use serde::{Deserialize, Serialize};
use starhelm_controllers::StickInput;
use starhelm_core::{Scalar, Vec3};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotMode {
    /// Stick input drives the axis rates; thrust from the raw throttle.
    Manual,
    /// Goal seeking blended with avoidance.
    #[default]
    Autopilot,
    /// Upstream feeds a destination every tick along a path.
    FollowPath,
}

/// Per-segment overrides supplied by a path follower.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathHint {
    /// Bank to hold (deg) instead of banking into turns.
    pub roll_deg: Option<Scalar>,
    /// Replaces the controls throttle while following the path.
    pub throttle: Option<Scalar>,
}

/// Everything upstream logic may write. Read once per tick by the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlightControls {
    pub destination: Vec3,
    pub mode: PilotMode,
    pub path_hint: Option<PathHint>,
    throttle: Scalar,
    stick: StickInput,
}

impl Default for FlightControls {
    fn default() -> Self { Self::new(Vec3::ZERO) }
}

impl FlightControls {
    pub fn new(destination: Vec3) -> Self {
        Self {
            destination,
            mode: PilotMode::default(),
            path_hint: None,
            throttle: 1.0,
            stick: StickInput::default(),
        }
    }

    /// Stored as given; see [`throttle`](Self::throttle).
    pub fn set_throttle(&mut self, throttle: Scalar) { self.throttle = throttle; }

    /// Throttle clamped to `[0, 1]`; non-finite reads as zero.
    pub fn throttle(&self) -> Scalar {
        if self.throttle.is_finite() { self.throttle.clamp(0.0, 1.0) } else { 0.0 }
    }

    pub fn raw_throttle(&self) -> Scalar { self.throttle }

    pub fn set_stick(&mut self, pitch: Scalar, yaw: Scalar, roll: Scalar) {
        self.stick = StickInput::new(pitch, yaw, roll);
    }

    pub fn stick(&self) -> StickInput { self.stick }

    /// Throttle for path following: the hint wins when present.
    pub fn path_throttle(&self) -> Scalar {
        match self.path_hint.and_then(|h| h.throttle) {
            Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
            Some(_) => 0.0,
            None => self.throttle(),
        }
    }

    pub fn path_roll_deg(&self) -> Option<Scalar> {
        self.path_hint.and_then(|h| h.roll_deg).filter(|r| r.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_is_clamped_on_read_only() {
        let mut c = FlightControls::default();
        c.set_throttle(1.7);
        assert_eq!(c.raw_throttle(), 1.7);
        assert_eq!(c.throttle(), 1.0);
        c.set_throttle(-0.2);
        assert_eq!(c.throttle(), 0.0);
        c.set_throttle(f32::NAN);
        assert_eq!(c.throttle(), 0.0);
    }

    #[test]
    fn stick_is_clamped_on_write() {
        let mut c = FlightControls::default();
        c.set_stick(2.0, -0.5, -4.0);
        assert_eq!(c.stick(), StickInput { pitch: 1.0, yaw: -0.5, roll: -1.0 });
    }

    #[test]
    fn path_hint_overrides_throttle() {
        let mut c = FlightControls::default();
        c.set_throttle(0.9);
        assert_eq!(c.path_throttle(), 0.9);
        c.path_hint = Some(PathHint { roll_deg: Some(15.0), throttle: Some(0.4) });
        assert_eq!(c.path_throttle(), 0.4);
        assert_eq!(c.path_roll_deg(), Some(15.0));
        c.path_hint = Some(PathHint { roll_deg: None, throttle: Some(3.0) });
        assert_eq!(c.path_throttle(), 1.0);
    }

    #[test]
    fn modes_serialize_snake_case() {
        let s = serde_json::to_string(&PilotMode::FollowPath).unwrap();
        assert_eq!(s, "\"follow_path\"");
        let m: PilotMode = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(m, PilotMode::Manual);
    }
}
