use starhelm_core::{BodyId, Obstacle, ObstacleSource, Scalar, Vec3};
use starhelm_geom::Aabb;

#[derive(Copy, Clone, Debug)]
struct SnapshotEntry {
    obstacle: Obstacle,
    aabb: Aabb,
}

/// Immutable per-tick copy of every collider, sorted along X.
///
/// Sphere queries cut the candidate run with a binary search on `aabb.min.x`
/// and finish with a closest-point test, so results come back in a fixed
/// order regardless of insertion order.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl ObstacleSnapshot {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(n: usize) -> Self { Self { entries: Vec::with_capacity(n) } }

    /// Entries with a non-finite box are skipped.
    pub fn push(&mut self, obstacle: Obstacle, aabb: Aabb) {
        if !aabb.is_finite() { return; }
        self.entries.push(SnapshotEntry { obstacle, aabb });
    }

    /// Sort for querying. Must be called after the last `push` of a tick.
    pub fn finish(&mut self) {
        self.entries.sort_by(|a, b| {
            a.aabb.min.x.total_cmp(&b.aabb.min.x).then(a.obstacle.id.cmp(&b.obstacle.id))
        });
    }

    pub fn clear(&mut self) { self.entries.clear(); }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl ObstacleSource for ObstacleSnapshot {
    fn query_sphere(&self, center: Vec3, range: Scalar, exclude: BodyId, out: &mut Vec<Obstacle>) {
        let range = range.max(0.0);
        let hi_x = center.x + range;
        let end = self.entries.partition_point(|e| e.aabb.min.x <= hi_x);
        for e in &self.entries[..end] {
            if e.obstacle.id == exclude { continue; }
            if e.aabb.max.x < center.x - range { continue; }
            if e.aabb.overlaps_sphere(center, range) {
                out.push(e.obstacle);
            }
        }
    }
}
