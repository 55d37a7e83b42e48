use std::fmt;

use m32x_time::{ClockError, VirtualClock, SECOND};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Handle to an execution context registered with a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread#{}", self.0)
    }
}

/// Outcome of a synchronization point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The thread is not ahead of its companion and may keep running.
    Continue,
    /// The thread must hand control back until the companion catches up.
    Yield,
}

/// A logical thread of control driven by the scheduler.
pub trait Thread<S: ?Sized> {
    /// Execution context backing this thread, if it has been powered on.
    fn thread(&self) -> Option<ThreadId>;

    /// Run until the next synchronization point that yields.
    fn enter(&mut self, scheduler: &mut Scheduler, system: &mut S);
}

#[derive(Debug)]
struct Context {
    id: ThreadId,
    clock: VirtualClock,
}

/// Owns the virtual clock of every cooperating execution context.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Kept in creation order; dispatch ties go to the earliest entry.
    contexts: Vec<Context>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new execution context running at `frequency_hz`.
    ///
    /// The context joins at the earliest time of the contexts already registered, so a
    /// re-created context does not have to replay time the others have already spent.
    pub fn create(&mut self, frequency_hz: u64) -> Result<ThreadId, SchedulerError> {
        let start = self.contexts.iter().map(|c| c.clock.time()).min().unwrap_or(0);
        let clock = VirtualClock::starting_at(frequency_hz, start)?;

        let id = ThreadId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.contexts.push(Context { id, clock });

        tracing::debug!(%id, frequency_hz, start, "created execution context");
        Ok(id)
    }

    /// Detach an execution context. Unknown ids are ignored.
    pub fn remove(&mut self, id: ThreadId) {
        let before = self.contexts.len();
        self.contexts.retain(|c| c.id != id);
        if self.contexts.len() != before {
            tracing::debug!(%id, "removed execution context");
        }
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.context(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn clock(&self, id: ThreadId) -> Option<&VirtualClock> {
        self.context(id).map(|c| &c.clock)
    }

    /// The synchronization unit: the longest single-cycle period of any registered context.
    ///
    /// With single-cycle steps, the clocks of two cooperating contexts never differ by more than
    /// this at a dispatch point.
    pub fn quota(&self) -> u64 {
        self.contexts.iter().map(|c| c.clock.period()).max().unwrap_or(0)
    }

    /// Absolute difference between two contexts' clocks in time-base units.
    pub fn skew(&self, a: ThreadId, b: ThreadId) -> Option<u64> {
        let a = self.clock(a)?.time();
        let b = self.clock(b)?.time();
        Some(a.abs_diff(b))
    }

    /// Advance `id` by `clocks` cycles of its own frequency.
    pub fn step(&mut self, id: ThreadId, clocks: u64) {
        let Some(context) = self.contexts.iter_mut().find(|c| c.id == id) else {
            return;
        };
        context.clock.advance(clocks);
        self.normalize();
    }

    /// Decide whether `id` may keep running or must wait for `companion`.
    ///
    /// A thread without a registered companion always yields, so it hands control back after
    /// every step instead of running unbounded.
    pub fn synchronize(&self, id: ThreadId, companion: ThreadId) -> SyncState {
        match (self.clock(id), self.clock(companion)) {
            (Some(this), Some(other)) if this.time() <= other.time() => SyncState::Continue,
            _ => SyncState::Yield,
        }
    }

    /// The context that is furthest behind and therefore runs next.
    pub fn next(&self) -> Option<ThreadId> {
        let mut best: Option<&Context> = None;
        for context in &self.contexts {
            match best {
                Some(b) if b.clock.time() <= context.clock.time() => {}
                _ => best = Some(context),
            }
        }
        best.map(|c| c.id)
    }

    /// Perform up to `slices` dispatches, each resuming the thread that is furthest behind.
    ///
    /// Returns the number of dispatches performed. Stops early if the next context has no
    /// matching thread in `threads` or nothing is registered.
    pub fn run_for<S: ?Sized>(
        &mut self,
        threads: &mut [&mut dyn Thread<S>],
        system: &mut S,
        slices: u64,
    ) -> u64 {
        for slice in 0..slices {
            let Some(id) = self.next() else {
                return slice;
            };
            let Some(thread) = threads.iter_mut().find(|t| t.thread() == Some(id)) else {
                tracing::warn!(%id, "no thread is bound to the next execution context");
                return slice;
            };
            thread.enter(self, system);
        }
        slices
    }

    fn context(&self, id: ThreadId) -> Option<&Context> {
        self.contexts.iter().find(|c| c.id == id)
    }

    fn normalize(&mut self) {
        if self.contexts.iter().all(|c| c.clock.time() >= SECOND) {
            for context in &mut self.contexts {
                context.clock.rebase(SECOND);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_frequency_is_rejected() {
        let mut sched = Scheduler::new();
        assert_eq!(
            sched.create(0),
            Err(SchedulerError::Clock(ClockError::ZeroFrequency))
        );
        assert!(sched.is_empty());
    }

    #[test]
    fn ahead_thread_yields_until_companion_catches_up() {
        let mut sched = Scheduler::new();
        let fast = sched.create(23_000_000).unwrap();
        let slow = sched.create(7_670_454).unwrap();

        assert_eq!(sched.synchronize(fast, slow), SyncState::Continue);
        sched.step(fast, 1);
        assert_eq!(sched.synchronize(fast, slow), SyncState::Yield);
        assert_eq!(sched.next(), Some(slow));

        sched.step(slow, 1);
        assert_eq!(sched.synchronize(fast, slow), SyncState::Continue);
        assert_eq!(sched.next(), Some(fast));
    }

    #[test]
    fn ties_go_to_the_first_created_context() {
        let mut sched = Scheduler::new();
        let a = sched.create(1_000).unwrap();
        let b = sched.create(1_000).unwrap();
        assert_eq!(sched.next(), Some(a));

        sched.step(a, 1);
        assert_eq!(sched.next(), Some(b));
        sched.step(b, 1);
        assert_eq!(sched.next(), Some(a));
    }

    #[test]
    fn unknown_companion_always_yields() {
        let mut sched = Scheduler::new();
        let a = sched.create(1_000).unwrap();
        let b = sched.create(1_000).unwrap();
        sched.remove(b);

        assert_eq!(sched.synchronize(a, b), SyncState::Yield);
        // Removing twice is harmless.
        sched.remove(b);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn recreated_context_joins_at_earliest_time() {
        let mut sched = Scheduler::new();
        let cpu = sched.create(1_000).unwrap();
        let shm = sched.create(2_000).unwrap();
        sched.step(cpu, 10);
        sched.step(shm, 30);

        sched.remove(shm);
        let shm = sched.create(2_000).unwrap();
        let clock = sched.clock(shm).unwrap();
        assert_eq!(clock.time(), sched.clock(cpu).unwrap().time());
        assert_eq!(clock.cycles(), 0);
    }

    #[test]
    fn quota_is_longest_single_cycle_period() {
        let mut sched = Scheduler::new();
        assert_eq!(sched.quota(), 0);
        let fast = sched.create(23_000_000).unwrap();
        let slow = sched.create(7_670_454).unwrap();
        assert_eq!(sched.quota(), sched.clock(slow).unwrap().period());
        assert!(sched.quota() > sched.clock(fast).unwrap().period());
    }

    #[test]
    fn clocks_are_rebased_once_all_pass_one_second() {
        let mut sched = Scheduler::new();
        let a = sched.create(1).unwrap();
        let b = sched.create(1).unwrap();

        sched.step(a, 1);
        assert_eq!(sched.clock(a).unwrap().time(), SECOND);
        sched.step(b, 1);

        assert_eq!(sched.clock(a).unwrap().time(), 0);
        assert_eq!(sched.clock(b).unwrap().time(), 0);
        assert_eq!(sched.clock(a).unwrap().cycles(), 1);
        assert_eq!(sched.skew(a, b), Some(0));
    }
}
