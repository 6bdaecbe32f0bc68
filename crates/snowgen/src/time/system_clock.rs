use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// The wall clock, truncated to whole milliseconds.
///
/// Every call reads `SystemTime::now()`, so an NTP step or a manual clock
/// change is visible to the generator and surfaces as
/// [`Error::ClockRewound`]. Use [`MonotonicClock`] where that is undesirable.
///
/// A system time before 1970 reads as `0`, which the generator then rejects
/// as out of range.
///
/// [`Error::ClockRewound`]: crate::Error::ClockRewound
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EPOCH;

    #[test]
    fn reads_past_default_epoch() {
        assert!(SystemClock.current_millis() > DEFAULT_EPOCH.as_millis() as u64);
    }
}
