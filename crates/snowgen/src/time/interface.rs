use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Sunday, October 11, 2020 12:00:00 UTC.
///
/// A 41-bit millisecond timestamp measured from here lasts until 2090.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_602_388_800_000);

/// A source of the current time in **milliseconds since the Unix epoch**.
///
/// The generator subtracts its own epoch, so implementations report absolute
/// time. This abstraction lets you plug in the wall clock, a monotonic
/// ticker, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use snowgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_602_388_800_001
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_602_388_800_001);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
