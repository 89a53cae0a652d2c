use starhelm_core::{EngineParams, FlightBody, PropulsionStrategy, Scalar, Vec3};
use tracing::trace;

#[derive(Copy, Clone, Debug)]
pub struct PropulsionParams {
    pub max_speed: Scalar,
    pub acceleration_rate: Scalar, // fraction of max_speed gained per second (velocity mode)
    pub slip: Scalar,              // how hard lateral velocity is bent toward the nose
    pub strategy: PropulsionStrategy,
}

impl PropulsionParams {
    pub fn from_engine(p: &EngineParams) -> Self {
        Self {
            max_speed: p.max_speed,
            acceleration_rate: p.acceleration_rate,
            slip: p.slip,
            strategy: p.propulsion,
        }
    }
}

impl Default for PropulsionParams {
    fn default() -> Self { Self::from_engine(&EngineParams::default()) }
}

/// Converts a throttle into linear motion along the body's forward axis.
/// Every path ends with `|v| <= max_speed` written back to the body.
#[derive(Copy, Clone, Debug, Default)]
pub struct PropulsionCtrl {
    pub params: PropulsionParams,
}

impl PropulsionCtrl {
    pub fn new(params: PropulsionParams) -> Self { Self { params } }

    /// Run the configured strategy. Returns the speed written to the body.
    pub fn apply<B: FlightBody + ?Sized>(&self, body: &mut B, throttle: Scalar, dt: Scalar) -> Scalar {
        self.apply_with(self.params.strategy, body, throttle, dt)
    }

    pub fn apply_with<B: FlightBody + ?Sized>(
        &self,
        strategy: PropulsionStrategy,
        body: &mut B,
        throttle: Scalar,
        dt: Scalar,
    ) -> Scalar {
        match strategy {
            PropulsionStrategy::Force => self.apply_force(body, throttle, dt),
            PropulsionStrategy::Velocity => self.apply_velocity(body, throttle, dt),
        }
    }

    /// Thrust through the host, then bleed lateral velocity toward the nose.
    ///
    /// The bleed factor grows with how well velocity already lines up with
    /// forward and with forward speed, so a body drifting sideways keeps most
    /// of its drift while one flying nose-first tracks its heading.
    pub fn apply_force<B: FlightBody + ?Sized>(&self, body: &mut B, throttle: Scalar, dt: Scalar) -> Scalar {
        let p = &self.params;
        let fwd = body.forward();
        body.add_acceleration(fwd * p.max_speed * throttle);

        let mut v = body.linear_velocity();
        if v.length_squared() > 0.0 {
            let align = fwd.dot(v.normalize());
            let align = align * align;
            let fwd_speed = body.to_local(v).z.max(0.0);
            let t = (align * fwd_speed * p.slip * dt).clamp(0.0, 1.0);
            v = v.lerp(fwd * fwd_speed, t);
        }
        self.write(body, v)
    }

    /// Ramp the forward component toward `max_speed * throttle` by
    /// `acceleration_rate * max_speed * dt`; the step that would cross the
    /// target lands exactly on it, aligned with the nose.
    pub fn apply_velocity<B: FlightBody + ?Sized>(&self, body: &mut B, throttle: Scalar, dt: Scalar) -> Scalar {
        let p = &self.params;
        let fwd = body.forward();
        let v = body.linear_velocity();
        let current = body.to_local(v).z;
        let target = p.max_speed * throttle;
        let step = p.acceleration_rate * p.max_speed * dt;

        let v = if current > target {
            if current - step <= target { fwd * target } else { v - fwd * step }
        } else if current < target {
            if current + step >= target { fwd * target } else { v + fwd * step }
        } else {
            v
        };
        self.write(body, v)
    }

    fn write<B: FlightBody + ?Sized>(&self, body: &mut B, v: Vec3) -> Scalar {
        let v = if v.is_finite() { v.clamp_length_max(self.params.max_speed.max(0.0)) } else { Vec3::ZERO };
        body.set_linear_velocity(v);
        let speed = v.length();
        trace!(body = %body.id(), speed, "propulsion");
        speed
    }
}

#[cfg(test)]
pub(crate) mod test_body {
    use starhelm_core::{BodyId, FlightBody, Quat, Vec3};

    /// Minimal host: pending acceleration is folded in by `host_step`.
    #[derive(Clone, Debug)]
    pub struct TestBody {
        pub pos: Vec3,
        pub rot: Quat,
        pub lin: Vec3,
        pub ang: Vec3,
        pub pending: Vec3,
    }

    impl TestBody {
        pub fn at_rest(rot: Quat) -> Self {
            Self { pos: Vec3::ZERO, rot, lin: Vec3::ZERO, ang: Vec3::ZERO, pending: Vec3::ZERO }
        }
        pub fn host_step(&mut self, dt: f32) {
            self.lin += self.pending * dt;
            self.pending = Vec3::ZERO;
            self.pos += self.lin * dt;
        }
    }

    impl FlightBody for TestBody {
        fn id(&self) -> BodyId { BodyId(0) }
        fn position(&self) -> Vec3 { self.pos }
        fn rotation(&self) -> Quat { self.rot }
        fn linear_velocity(&self) -> Vec3 { self.lin }
        fn angular_velocity(&self) -> Vec3 { self.ang }
        fn set_linear_velocity(&mut self, v: Vec3) { self.lin = v; }
        fn set_angular_velocity(&mut self, w: Vec3) { self.ang = w; }
        fn add_acceleration(&mut self, a: Vec3) { self.pending += a; }
    }
}
