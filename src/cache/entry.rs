//! Cache Entry Module
//!
//! Defines a single live entry: its value, expiry timer and generation.
//!
//! Times are readings of the owning cache's scheduler clock, the same clock
//! its expiry timers run on.

use std::time::Duration;

use crate::scheduler::TimerHandle;

// == Cache Entry ==
/// Represents a single cache entry with value and eviction metadata.
///
/// A timer captures the entry's generation when armed; it may only evict the
/// entry while that generation is still current.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Generation assigned by the last put or counted access
    pub generation: u64,
    /// Idle timeout for this entry, zero = never expires
    pub ttl: Duration,
    /// Scheduler clock reading at the last put or counted access
    pub touched_at: Duration,
    /// Pending expiry timer, None when the entry never expires
    timer: Option<TimerHandle>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry armed with the given timer.
    pub fn new(value: V, generation: u64, ttl: Duration, now: Duration, timer: Option<TimerHandle>) -> Self {
        Self {
            value,
            generation,
            ttl,
            touched_at: now,
            timer,
        }
    }

    // == Refresh ==
    /// Slides the idle window: installs a new generation and timer.
    ///
    /// Returns the previous timer so the caller can cancel it.
    pub fn refresh(&mut self, generation: u64, now: Duration, timer: Option<TimerHandle>) -> Option<TimerHandle> {
        self.generation = generation;
        self.touched_at = now;
        std::mem::replace(&mut self.timer, timer)
    }

    /// Detaches the pending timer, leaving the entry unarmed.
    pub fn take_timer(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }

    /// Consumes the entry, returning its value and pending timer.
    pub fn into_parts(self) -> (V, Option<TimerHandle>) {
        (self.value, self.timer)
    }

    // == Idle Time ==
    /// Time elapsed at `now` since the last put or counted access.
    pub fn idle_for(&self, now: Duration) -> Duration {
        now.saturating_sub(self.touched_at)
    }

    // == Time To Live ==
    /// Remaining time before the entry becomes eligible for eviction.
    ///
    /// # Returns
    /// - `None` if the entry never expires
    /// - `Some(Duration::ZERO)` once the idle window has fully elapsed
    pub fn ttl_remaining(&self, now: Duration) -> Option<Duration> {
        if self.ttl.is_zero() {
            return None;
        }
        Some(self.ttl.saturating_sub(self.idle_for(now)))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_entry_never_expires_with_zero_ttl() {
        let entry = CacheEntry::new("value", 1, Duration::ZERO, ms(0), None);
        assert!(entry.ttl_remaining(ms(10_000)).is_none());
    }

    #[test]
    fn test_ttl_remaining_counts_down() {
        let entry = CacheEntry::new("value", 1, ms(100), ms(500), None);

        assert_eq!(entry.ttl_remaining(ms(500)), Some(ms(100)));
        assert_eq!(entry.ttl_remaining(ms(590)), Some(ms(10)));
        assert_eq!(entry.idle_for(ms(590)), ms(90));
    }

    #[test]
    fn test_ttl_remaining_saturates_at_zero() {
        let entry = CacheEntry::new("value", 1, ms(10), ms(0), None);
        assert_eq!(entry.ttl_remaining(ms(30)), Some(Duration::ZERO));
    }

    #[test]
    fn test_reading_before_touch_is_not_idle() {
        let entry = CacheEntry::new("value", 1, ms(10), ms(50), None);
        assert_eq!(entry.idle_for(ms(40)), Duration::ZERO);
    }

    #[test]
    fn test_refresh_swaps_generation_and_timer() {
        let mut entry = CacheEntry::new("value", 1, ms(1000), ms(0), Some(TimerHandle::new(7)));

        let old = entry.refresh(2, ms(20), Some(TimerHandle::new(8)));

        assert_eq!(old.map(|t| t.id()), Some(7));
        assert_eq!(entry.generation, 2);
        assert_eq!(entry.idle_for(ms(20)), Duration::ZERO);
        assert_eq!(entry.take_timer().map(|t| t.id()), Some(8));
        assert!(entry.take_timer().is_none());
    }
}
