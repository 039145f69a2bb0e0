//! Nullable clock — deterministic time for testing.

use std::cell::Cell;
use vouch_types::Timestamp;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_frozen_until_advanced() {
        let clock = NullClock::new(1000);
        assert_eq!(clock.now(), Timestamp::new(1000));
        assert_eq!(clock.now(), Timestamp::new(1000));

        clock.advance(300);
        assert_eq!(clock.now(), Timestamp::new(1300));
    }

    #[test]
    fn set_jumps_to_absolute_time() {
        let clock = NullClock::new(0);
        clock.set(5000);
        assert_eq!(clock.now(), Timestamp::new(5000));
    }
}
