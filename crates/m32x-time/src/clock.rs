use thiserror::Error;

/// Shared time-base units per emulated second.
///
/// Using half the `u64` range leaves headroom for one second of drift between contexts before the
/// scheduler has to rebase them.
pub const SECOND: u64 = u64::MAX >> 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("clock frequency must be non-zero")]
    ZeroFrequency,
}

/// Cycle counter for one execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualClock {
    frequency_hz: u64,
    /// Time-base units per cycle.
    period: u64,
    /// Scaled time; only ever compared against other clocks of the same scheduler.
    time: u64,
    cycles: u64,
}

impl VirtualClock {
    pub fn new(frequency_hz: u64) -> Result<Self, ClockError> {
        Self::starting_at(frequency_hz, 0)
    }

    /// Create a clock whose scaled time starts at `time` instead of zero.
    ///
    /// Used when a context joins a scheduler that has already been running; the cycle counter
    /// still starts at zero.
    pub fn starting_at(frequency_hz: u64, time: u64) -> Result<Self, ClockError> {
        if frequency_hz == 0 {
            return Err(ClockError::ZeroFrequency);
        }
        Ok(Self {
            frequency_hz,
            period: (SECOND / frequency_hz).max(1),
            time,
            cycles: 0,
        })
    }

    pub fn frequency_hz(&self) -> u64 {
        self.frequency_hz
    }

    /// Time-base units covered by a single cycle.
    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    /// Cycles retired since this clock was created.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn advance(&mut self, clocks: u64) {
        self.cycles = self.cycles.wrapping_add(clocks);
        self.time = self.time.saturating_add(self.period.saturating_mul(clocks));
    }

    /// Subtract a common offset from the scaled time.
    ///
    /// The scheduler applies the same `delta` to every clock so relative order is unchanged.
    pub fn rebase(&mut self, delta: u64) {
        self.time = self.time.saturating_sub(delta);
    }

    /// Emulated nanoseconds covered by the retired cycles.
    pub fn elapsed_ns(&self) -> u64 {
        let ns = (self.cycles as u128) * 1_000_000_000u128 / (self.frequency_hz as u128);
        ns.min(u64::MAX as u128) as u64
    }
}
