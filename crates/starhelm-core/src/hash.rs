//! blake3 digests over simulation state, used to check that two runs of the
//! same scenario stay bit-identical.

use blake3::Hasher;
use glam::Quat;
use crate::{BodyId, Isometry, Vec3, Velocity};

pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { StepHasher(Hasher::new()) }
    pub fn update_bytes(&mut self, bytes: &[u8]) { self.0.update(bytes); }

    /// Tick counter goes in first so identical states at different ticks differ.
    pub fn tick(&mut self, tick: u64) { self.update_bytes(&tick.to_le_bytes()); }

    /// One body: id, pose, then linear and angular velocity. All floats little-endian.
    pub fn body(&mut self, id: BodyId, pose: &Isometry, vel: &Velocity) {
        self.update_bytes(&id.0.to_le_bytes());
        hash_vec3(self, &pose.pos);
        hash_quat(self, &pose.rot);
        hash_vec3(self, &vel.lin);
        hash_vec3(self, &vel.ang);
    }

    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for StepHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_vec3(h: &mut StepHasher, v: &Vec3) {
    for c in [v.x, v.y, v.z] { h.update_bytes(&c.to_le_bytes()); }
}

#[inline]
pub fn hash_quat(h: &mut StepHasher, q: &Quat) {
    for c in [q.x, q.y, q.z, q.w] { h.update_bytes(&c.to_le_bytes()); }
}

/// Lowercase hex rendering of a digest.
pub fn digest_hex(d: &[u8; 32]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(64);
    for b in d { let _ = write!(s, "{:02x}", b); }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn digest(tick: u64, x: f32) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.tick(tick);
        let pose = Isometry { pos: vec3(x, 0.0, 0.0), rot: Quat::IDENTITY };
        h.body(BodyId(0), &pose, &Velocity::default());
        h.finalize()
    }

    #[test]
    fn same_state_same_digest() {
        assert_eq!(digest(3, 1.5), digest(3, 1.5));
    }

    #[test]
    fn tick_and_position_both_matter() {
        assert_ne!(digest(3, 1.5), digest(4, 1.5));
        assert_ne!(digest(3, 1.5), digest(3, 1.6));
    }

    #[test]
    fn hex_is_64_lowercase_chars() {
        let s = digest_hex(&digest(0, 0.0));
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
