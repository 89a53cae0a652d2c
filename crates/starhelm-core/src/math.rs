//! Small scalar helpers shared by the control laws.
use core::f32::consts::{PI, TAU};
use crate::Scalar;

/// Wrap an angle in radians into `[-PI, PI]`.
#[inline]
pub fn wrap_pi(a: Scalar) -> Scalar {
    if !a.is_finite() { return 0.0; }
    (a + PI).rem_euclid(TAU) - PI
}

/// Wrap an angle in degrees into `[-180, 180]`.
#[inline]
pub fn wrap_180(deg: Scalar) -> Scalar { wrap_pi(deg.to_radians()).to_degrees() }

/// Sign with zero counted as positive.
#[inline]
pub fn sign(x: Scalar) -> Scalar { if x >= 0.0 { 1.0 } else { -1.0 } }

/// Clamp into `[-limit, limit]`; a negative limit collapses to zero instead of panicking.
#[inline]
pub fn clamp_abs(x: Scalar, limit: Scalar) -> Scalar {
    let l = limit.max(0.0);
    x.max(-l).min(l)
}
