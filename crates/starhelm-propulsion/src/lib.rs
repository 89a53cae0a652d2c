mod propulsion;

pub use propulsion::{PropulsionCtrl, PropulsionParams};
