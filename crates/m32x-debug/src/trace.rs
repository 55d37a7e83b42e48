use std::collections::VecDeque;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Event classes a [`Tracer`] keeps.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceKinds: u8 {
        /// One event per executed instruction.
        const INSTRUCTION = 1 << 0;
        /// Every lane-selected word transaction the SHM puts on the shared bus.
        const BUS = 1 << 1;
        /// Power-on and reset.
        const LIFECYCLE = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TraceEvent {
    /// About to execute the instruction at `pc`.
    Instruction { pc: u32, cycle: u64 },
    /// A word transaction as seen on the 16-bit bus, after width adaptation.
    Bus {
        cycle: u64,
        write: bool,
        upper: bool,
        lower: bool,
        address: u32,
        data: u16,
    },
    Power { reset: bool },
}

impl TraceEvent {
    pub fn kind(&self) -> TraceKinds {
        match self {
            TraceEvent::Instruction { .. } => TraceKinds::INSTRUCTION,
            TraceEvent::Bus { .. } => TraceKinds::BUS,
            TraceEvent::Power { .. } => TraceKinds::LIFECYCLE,
        }
    }
}

/// Bounded log of the most recent events. Once full, each new event overwrites the oldest one
/// and bumps [`Tracer::overwritten`], so tooling can tell a quiet trace from a truncated one.
#[derive(Debug)]
pub struct Tracer {
    kinds: TraceKinds,
    events: VecDeque<TraceEvent>,
    capacity: usize,
    overwritten: u64,
}

#[derive(Serialize)]
struct Export<'a> {
    overwritten: u64,
    events: &'a VecDeque<TraceEvent>,
}

impl Tracer {
    /// A disabled tracer holding at most `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            kinds: TraceKinds::empty(),
            events: VecDeque::new(),
            capacity: capacity.max(1),
            overwritten: 0,
        }
    }

    pub fn kinds(&self) -> TraceKinds {
        self.kinds
    }

    /// Whether any event of `kinds` would currently be kept.
    pub fn wants(&self, kinds: TraceKinds) -> bool {
        self.kinds.intersects(kinds)
    }

    pub fn is_enabled(&self) -> bool {
        !self.kinds.is_empty()
    }

    /// Record events of `kinds` from now on, replacing the previous selection.
    pub fn enable(&mut self, kinds: TraceKinds) {
        self.kinds = kinds;
    }

    pub fn disable(&mut self) {
        self.kinds = TraceKinds::empty();
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.overwritten = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to the ring wrapping since the last [`Tracer::clear`].
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }

    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter()
    }

    pub fn record(&mut self, event: TraceEvent) {
        if !self.wants(event.kind()) {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.overwritten += 1;
        }
        self.events.push_back(event);
    }

    /// Remove and return up to `max` of the oldest events.
    pub fn drain(&mut self, max: usize) -> Vec<TraceEvent> {
        let max = max.min(self.events.len());
        self.events.drain(..max).collect()
    }

    /// `{"overwritten": n, "events": [...]}` with each event tagged by `type`.
    pub fn export_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&Export {
            overwritten: self.overwritten,
            events: &self.events,
        })
    }
}
