use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of a body in the host world. Obstacles reuse the same id space so a
/// ship can exclude itself from its own spatial query.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({})", self.0) } }
