//! Local wall clock used to pick time-of-day salutations.

use chrono::Timelike;

/// Source of the local hour.
pub trait Clock: Send + Sync {
    /// Current local hour in `0..24`.
    fn local_hour(&self) -> u32;
}

/// The system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// A clock frozen at a given hour, for deterministic replies.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0 % 24
    }
}
