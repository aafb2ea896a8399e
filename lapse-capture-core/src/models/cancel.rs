use std::time::Instant;

use parking_lot::{Condvar, Mutex};

/// A sampled cancellation signal.
///
/// Events are not queued: signalling twice before the scheduler samples the
/// token coalesces into the strongest event seen
/// (`AbortRequested` > `StopRequested` > `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CancelEvent {
    #[default]
    None,
    /// Graceful stop: finish the current cycle, run normal teardown.
    StopRequested,
    /// Abort: exit the loop at the next poll point.
    AbortRequested,
}

impl CancelEvent {
    pub fn strongest(self, other: CancelEvent) -> CancelEvent {
        self.max(other)
    }

    pub fn is_none(self) -> bool {
        self == CancelEvent::None
    }
}

/// Outcome of a blocking wait on a [`CancelToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deadline was reached with no cancel event pending.
    DeadlineReached,
    /// A cancel event arrived before the deadline (or was already pending).
    Cancelled(CancelEvent),
}

/// Poll-able, wait-able cancellation event shared between the scheduling
/// thread and whatever delivers cancel signals (signal watcher, keypress
/// listener, test threads).
///
/// Sampling is edge-triggered: both `take` and a wait that returns
/// `Cancelled` reset the pending event to `None`.
#[derive(Debug, Default)]
pub struct CancelToken {
    event: Mutex<CancelEvent>,
    condvar: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cancel event, coalescing with any event already pending,
    /// and wake a blocked `wait_deadline` call.
    pub fn signal(&self, event: CancelEvent) {
        if event.is_none() {
            return;
        }
        let mut pending = self.event.lock();
        *pending = pending.strongest(event);
        self.condvar.notify_all();
    }

    /// Sample and reset the pending event.
    pub fn take(&self) -> CancelEvent {
        std::mem::take(&mut *self.event.lock())
    }

    /// Block until `deadline`, waking early if a cancel event arrives.
    pub fn wait_deadline(&self, deadline: Instant) -> WaitOutcome {
        let mut pending = self.event.lock();
        loop {
            if !pending.is_none() {
                return WaitOutcome::Cancelled(std::mem::take(&mut *pending));
            }
            if self.condvar.wait_until(&mut pending, deadline).timed_out() {
                if !pending.is_none() {
                    return WaitOutcome::Cancelled(std::mem::take(&mut *pending));
                }
                return WaitOutcome::DeadlineReached;
            }
        }
    }
}
