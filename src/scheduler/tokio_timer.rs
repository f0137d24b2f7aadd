//! Tokio Timer Scheduler
//!
//! One spawned task per armed timer: sleep, then run the task on the runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::trace;

use super::{Scheduler, TimerHandle, TimerTask};
use crate::error::{BridgeError, Result};

// == Tokio Scheduler ==
/// Scheduler backed by the tokio timer.
///
/// Without an explicit runtime handle, timers are spawned onto the runtime
/// current at `schedule` time; calling it outside any runtime is a
/// `SchedulingFailure`.
///
/// The clock is tokio's, so paused test time applies to `now` as well.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Option<Handle>,
    next_id: AtomicU64,
    epoch: Instant,
}

impl TokioScheduler {
    /// Creates a scheduler that spawns onto the caller's current runtime.
    pub fn new() -> Self {
        Self {
            runtime: None,
            next_id: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    /// Creates a scheduler pinned to the given runtime.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
            ..Self::new()
        }
    }

    fn runtime(&self) -> Result<Handle> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current()
                .map_err(|e| BridgeError::SchedulingFailure(format!("no tokio runtime: {e}"))),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Result<TimerHandle> {
        let runtime = self.runtime()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Deadline is fixed now, not when the spawned task is first polled.
        let deadline = Instant::now().checked_add(delay);

        let join = runtime.spawn(async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => tokio::time::sleep(delay).await,
            }
            trace!(timer = id, "timer fired");
            task();
        });

        Ok(TimerHandle::with_abort(id, join.abort_handle()))
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(abort) = handle.abort_handle() {
            abort.abort();
        }
    }

    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.epoch)
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}
