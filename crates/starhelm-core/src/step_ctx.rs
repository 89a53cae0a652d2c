/// Per-tick context handed to every controller evaluation.
#[derive(Copy, Clone, Debug)]
pub struct StepCtx {
    pub dt: f32,
    pub tick: u64,
}

impl StepCtx {
    pub fn new(dt: f32, tick: u64) -> Self { Self { dt, tick } }
}
