use std::io::Write;

use serde::{Deserialize, Serialize};
use starhelm_core::{BodyId, Scalar, Vec3};

/// One line of per-tick flight telemetry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    PossibleCollision { tick: u64, ship: BodyId, obstacle: BodyId, time_to_impact: Scalar },
    Avoidance { tick: u64, ship: BodyId, force: Vec3 },
    Goal { tick: u64, ship: BodyId, direction: Vec3, speed: Scalar },
    Steering { tick: u64, ship: BodyId, angular_velocity: Vec3 },
    Propulsion { tick: u64, ship: BodyId, throttle: Scalar, speed: Scalar },
    Skipped { tick: u64, ship: BodyId },
}

/// Bounded event buffer. Events past capacity are counted, not stored.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    events: Vec<LedgerEvent>,
    cap: usize,
    dropped: u64,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self { events: Vec::with_capacity(cap.min(4096)), cap, dropped: 0 }
    }

    pub fn push(&mut self, e: LedgerEvent) {
        if self.events.len() < self.cap {
            self.events.push(e);
        } else {
            self.dropped += 1;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn dropped(&self) -> u64 { self.dropped }

    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }

    /// One JSON object per line, in push order.
    pub fn write_jsonl<W: Write>(&self, mut w: W) -> serde_json::Result<()> {
        for e in &self.events {
            serde_json::to_writer(&mut w, e)?;
            w.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        Ok(())
    }
}
