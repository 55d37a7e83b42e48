//! Per-context virtual clocks for cooperatively scheduled processors.
//!
//! Every execution context counts the cycles it has retired at its own native frequency. To
//! compare contexts that run at different rates, cycles are also scaled into a shared time base
//! of [`SECOND`] units per emulated second. Ordering and skew between contexts are decided in
//! that shared base; the raw cycle counter stays monotonic for reporting.

#![forbid(unsafe_code)]

mod clock;

pub use clock::{ClockError, VirtualClock, SECOND};
