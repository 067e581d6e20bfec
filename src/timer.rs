//! Repaint scheduling.
//!
//! The repaint timer is the only recurring scheduled operation in the
//! viewer. Its lifetime is tied 1:1 to the detecting-state: the viewer
//! creates it on the false->true transition and drops it on true->false,
//! so a leaked or overlapping timer cannot exist. The timer never paints
//! itself; callers poll it from the cooperative event loop.

use std::time::{Duration, Instant};

/// Fixed-cadence repaint schedule.
///
/// `poll` answers "is a repaint due now?" and advances the schedule. When
/// the caller falls behind, missed intervals collapse into a single due
/// tick; repainting is idempotent, so catch-up bursts would only waste work.
#[derive(Debug)]
pub struct RepaintTimer {
    interval: Duration,
    next_due: Instant,
}

impl RepaintTimer {
    /// Arm a timer whose first tick is one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// Arm a timer relative to an explicit start instant.
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_due: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when a tick is due at `now`, advancing the schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        let mut next = self.next_due + self.interval;
        if next <= now {
            // Missed one or more intervals; resynchronize to now.
            next = now + self.interval;
        }
        self.next_due = next;
        true
    }

    /// Time remaining until the next tick (zero when already due).
    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
