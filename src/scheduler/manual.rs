//! Manual Scheduler
//!
//! A virtual clock advanced explicitly by the caller. Fires are deterministic:
//! due timers run in deadline order (ties in scheduling order) on the thread
//! calling `advance`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use super::{Scheduler, TimerHandle, TimerTask};
use crate::error::{BridgeError, Result};

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), TimerTask>,
    deadlines: HashMap<u64, Duration>,
    failing: bool,
}

// == Manual Scheduler ==
/// Scheduler driven by an explicit virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of armed, not yet fired or cancelled timers.
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Makes every subsequent `schedule` call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    /// Moves the clock forward, running every timer that becomes due.
    ///
    /// Tasks run without the internal lock held, so they may arm new timers;
    /// those fire within the same call when they fall due before the target.
    /// Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now.saturating_add(by);
        let mut fired = 0;

        loop {
            let task = {
                let mut state = self.state.lock();
                let due = match state.timers.keys().next() {
                    Some(&(deadline, id)) if deadline <= target => (deadline, id),
                    _ => break,
                };
                state.now = due.0;
                state.deadlines.remove(&due.1);
                state.timers.remove(&due)
            };

            if let Some(task) = task {
                task();
                fired += 1;
            }
        }

        self.state.lock().now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Result<TimerHandle> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(BridgeError::SchedulingFailure(
                "manual scheduler is failing".to_string(),
            ));
        }

        let id = state.next_id;
        state.next_id += 1;
        // Saturate so a far-future delay parks the timer instead of panicking.
        let deadline = state.now.saturating_add(delay);
        state.timers.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);
        trace!(timer = id, ?deadline, "timer armed");

        Ok(TimerHandle::new(id))
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut state = self.state.lock();
        if let Some(deadline) = state.deadlines.remove(&handle.id()) {
            state.timers.remove(&(deadline, handle.id()));
        }
    }

    fn now(&self) -> Duration {
        ManualScheduler::now(self)
    }
}
