//! Deterministic cooperative scheduling of independently clocked processors.
//!
//! Each processor is modelled as a logical thread of control with its own [`VirtualClock`]. A
//! thread runs until it reaches a synchronization point where it is ahead of the context it
//! follows, then hands control back. The dispatcher always resumes whichever thread is furthest
//! behind, so the interleaving of bus accesses between processors is reproducible and the clocks
//! never drift apart by more than one [`Scheduler::quota`].
//!
//! The model is single-threaded: suspension is "return from [`Thread::enter`]", not an OS-level
//! block. Any parallel implementation would have to reproduce exactly this dispatch order.

#![forbid(unsafe_code)]

mod scheduler;

pub use m32x_time::{ClockError, VirtualClock, SECOND};
pub use scheduler::{Scheduler, SchedulerError, SyncState, Thread, ThreadId};
