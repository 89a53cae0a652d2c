//! Scalar motion profiles for closing an angular (or linear) distance under a
//! velocity cap and an acceleration cap, one fixed step at a time.
//!
//! `approach` handles a velocity already heading for the target, `away` a
//! velocity heading the wrong way; `toward` picks between them from the signs
//! of the error and the current rate. All three are pure.

mod profile;

pub use profile::{approach, away, toward, ProfileLimits};
