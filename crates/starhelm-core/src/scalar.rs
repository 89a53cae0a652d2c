/// Every quantity in the controller is single precision, matching the host physics step.
pub type Scalar = f32;
