//! Cycle-level model of the 32X secondary SH-2 ("SHM") and its lock-step coordination with the
//! companion processor.
//!
//! The workspace is split by concern; this crate only re-exports the pieces:
//!
//! * [`time`]: per-context virtual clocks.
//! * [`sched`]: deterministic cooperative scheduler with bounded clock skew.
//! * [`bus`]: 8/16/32-bit accesses over the 16-bit lane-strobed shared bus.
//! * [`debug`]: debug registration tree and instruction tracer.
//! * [`shm`]: the coprocessor itself (boot ROM, power/reset, per-instruction thread body).

#![forbid(unsafe_code)]

pub use m32x_bus as bus;
pub use m32x_debug as debug;
pub use m32x_sched as sched;
pub use m32x_shm as shm;
pub use m32x_time as time;
