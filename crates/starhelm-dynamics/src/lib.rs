use glam::Quat;
use starhelm_core::types::{Isometry, Velocity, Vec3};
use starhelm_core::{BodyId, FlightBody, Scalar};

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug, Default)]
pub struct BodyDesc {
    pub pose: Isometry,
    pub vel: Velocity,
    pub dynamic: bool,
}

/// SoA body storage with deterministic ID = index semantics.
///
/// Not a physics engine: no mass, no contacts. Velocities change only through
/// explicit writes and queued accelerations.
pub struct Bodies {
    pos: Vec<Vec3>,
    rot: Vec<Quat>,
    linvel: Vec<Vec3>,
    angvel: Vec<Vec3>,
    accel: Vec<Vec3>, // queued by add_acceleration, consumed by integrate_velocities
    dynamic: Vec<bool>,
}

impl Bodies {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            pos:     Vec::with_capacity(cap),
            rot:     Vec::with_capacity(cap),
            linvel:  Vec::with_capacity(cap),
            angvel:  Vec::with_capacity(cap),
            accel:   Vec::with_capacity(cap),
            dynamic: Vec::with_capacity(cap),
        }
    }

    pub fn add(&mut self, desc: BodyDesc) -> BodyId {
        self.pos.push(desc.pose.pos);
        self.rot.push(desc.pose.rot.normalize());
        self.linvel.push(desc.vel.lin);
        self.angvel.push(desc.vel.ang);
        self.accel.push(Vec3::ZERO);
        self.dynamic.push(desc.dynamic);
        BodyId((self.pos.len() as u32) - 1)
    }

    #[inline] pub fn len(&self) -> usize { self.pos.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pos.is_empty() }
    #[inline] pub fn contains(&self, id: BodyId) -> bool { (id.0 as usize) < self.len() }

    /// Fold queued accelerations into linear velocity and clear the queue.
    pub fn integrate_velocities(&mut self, dt: Scalar) {
        for i in 0..self.len() {
            let a = core::mem::take(&mut self.accel[i]);
            if !self.dynamic[i] { continue; }
            self.linvel[i] += a * dt;
        }
    }

    /// Advance position and orientation by the current velocities.
    pub fn integrate_poses(&mut self, dt: Scalar) {
        for i in 0..self.len() {
            if !self.dynamic[i] { continue; }
            self.pos[i] += self.linvel[i] * dt;
            let w = self.angvel[i];
            if w.length_squared() > 0.0 {
                self.rot[i] = (Quat::from_scaled_axis(w * dt) * self.rot[i]).normalize();
            }
        }
    }

    // -------- Accessors used by world/hash --------
    #[inline] pub fn pose(&self, id: BodyId) -> Isometry {
        let i = id.0 as usize;
        Isometry { pos: self.pos[i], rot: self.rot[i] }
    }
    #[inline] pub fn set_pose(&mut self, id: BodyId, iso: Isometry) {
        let i = id.0 as usize;
        self.pos[i] = iso.pos;
        self.rot[i] = iso.rot;
    }

    #[inline] pub fn vel(&self, id: BodyId) -> Velocity {
        let i = id.0 as usize;
        Velocity { lin: self.linvel[i], ang: self.angvel[i] }
    }
    #[inline] pub fn set_vel(&mut self, id: BodyId, v: Velocity) {
        let i = id.0 as usize;
        self.linvel[i] = v.lin;
        self.angvel[i] = v.ang;
    }

    #[inline] pub fn is_dynamic(&self, id: BodyId) -> bool { self.dynamic[id.0 as usize] }

    /// Command handle for one body, or `None` for an unknown id.
    pub fn handle_mut(&mut self, id: BodyId) -> Option<BodyMut<'_>> {
        if self.contains(id) { Some(BodyMut { bodies: self, id }) } else { None }
    }

    // Iterator for hashing in stable order
    pub fn indices(&self) -> impl ExactSizeIterator<Item = BodyId> + '_ {
        (0..(self.len() as u32)).map(BodyId)
    }
}

impl Default for Bodies {
    fn default() -> Self { Self::with_capacity(0) }
}

/// Mutable view of one stored body, handed to controllers for a tick.
pub struct BodyMut<'a> {
    bodies: &'a mut Bodies,
    id: BodyId,
}

impl FlightBody for BodyMut<'_> {
    fn id(&self) -> BodyId { self.id }
    fn position(&self) -> Vec3 { self.bodies.pos[self.id.0 as usize] }
    fn rotation(&self) -> Quat { self.bodies.rot[self.id.0 as usize] }
    fn linear_velocity(&self) -> Vec3 { self.bodies.linvel[self.id.0 as usize] }
    fn angular_velocity(&self) -> Vec3 { self.bodies.angvel[self.id.0 as usize] }
    fn set_linear_velocity(&mut self, v: Vec3) { self.bodies.linvel[self.id.0 as usize] = v; }
    fn set_angular_velocity(&mut self, w: Vec3) { self.bodies.angvel[self.id.0 as usize] = w; }
    fn add_acceleration(&mut self, a: Vec3) { self.bodies.accel[self.id.0 as usize] += a; }
}
