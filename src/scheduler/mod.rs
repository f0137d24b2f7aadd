//! Scheduler Module
//!
//! The timer seam the eviction cache depends on. Production code runs on the
//! tokio timer (`TokioScheduler`); tests and embedders that need
//! deterministic time can drive a `ManualScheduler` instead.
//!
//! Cancellation is best-effort: the cache guards every fire with a generation
//! check, so a timer that slips past `cancel` is inert.

mod manual;
mod tokio_timer;

use std::time::Duration;

use tokio::task::AbortHandle;

use crate::error::Result;

pub use manual::ManualScheduler;
pub use tokio_timer::TokioScheduler;

/// Work run once when a timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

// == Timer Handle ==
/// Opaque handle to a pending timer, returned by `Scheduler::schedule`.
#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    /// Creates a handle identified only by its id.
    pub fn new(id: u64) -> Self {
        Self { id, abort: None }
    }

    /// Creates a handle backed by a spawned tokio task.
    pub fn with_abort(id: u64, abort: AbortHandle) -> Self {
        Self {
            id,
            abort: Some(abort),
        }
    }

    /// Scheduler-assigned id of this timer.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn abort_handle(&self) -> Option<&AbortHandle> {
        self.abort.as_ref()
    }
}

// == Scheduler Trait ==
/// Runs a task once after a delay.
///
/// `schedule` must never run the task inline: callers may hold a per-key
/// lock while arming a timer.
pub trait Scheduler: Send + Sync + 'static {
    /// Arms a one-shot timer firing `task` after `delay`.
    fn schedule(&self, delay: Duration, task: TimerTask) -> Result<TimerHandle>;

    /// Cancels a pending timer. Cancelling a fired or unknown timer is a no-op.
    fn cancel(&self, handle: TimerHandle);

    /// Reading of the clock timer delays elapse on, from a fixed origin.
    fn now(&self) -> Duration;
}
