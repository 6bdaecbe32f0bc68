use crate::{SystemClock, TimeSource};
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

#[derive(Debug)]
struct Ticker {
    elapsed_ms: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A time source that never goes backwards.
///
/// The wall clock is sampled once at construction; afterwards the reported
/// time is that anchor plus the elapsed time of a monotonic [`Instant`].
/// Wall-clock adjustments made while the process runs (NTP steps, manual
/// changes) are therefore invisible, which rules out spurious
/// [`Error::ClockRewound`] errors caused by clock-source jitter.
///
/// A background thread refreshes a shared counter about once per
/// millisecond, keeping syscalls off the generation path. The thread exits
/// once the last clone of the clock is dropped.
///
/// Reported time drifts from the wall clock by however much the wall clock
/// is adjusted after construction.
///
/// # Example
///
/// ```
/// use snowgen::{MonotonicClock, SnowflakeGenerator, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(3));
/// assert!(clock.current_millis() >= a);
///
/// let generator = SnowflakeGenerator::with_time(0, 0, clock)?;
/// generator.next_id()?;
/// # Ok::<(), snowgen::Error>(())
/// ```
///
/// [`Error::ClockRewound`]: crate::Error::ClockRewound
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    anchor_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current wall-clock time and starts its
    /// ticker thread.
    pub fn new() -> Self {
        let start = Instant::now();
        let anchor_ms = SystemClock.current_millis();

        let ticker = Arc::new(Ticker {
            elapsed_ms: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak = Arc::downgrade(&ticker);
        let handle = thread::spawn(move || {
            let mut tick = 0;
            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let elapsed_ms = start.elapsed().as_millis() as u64;
                ticker.elapsed_ms.store(elapsed_ms, Ordering::Relaxed);
                tick = elapsed_ms + 1;
            }
        });
        let _ = ticker._handle.set(handle);

        Self { ticker, anchor_ms }
    }

    /// The wall-clock reading, in Unix milliseconds, this clock started from.
    pub const fn anchor_millis(&self) -> u64 {
        self.anchor_ms
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor_ms + self.ticker.elapsed_ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        assert!(last >= clock.anchor_millis());
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_elapsed_time() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > before);
    }

    #[test]
    fn clones_share_one_ticker() {
        let clock = MonotonicClock::new();
        let other = clock.clone();
        assert!(Arc::ptr_eq(&clock.ticker, &other.ticker));
        assert_eq!(clock.anchor_millis(), other.anchor_millis());
    }
}
