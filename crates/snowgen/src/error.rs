/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The configuration field that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    WorkerId,
    DatacenterId,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WorkerId => f.write_str("worker_id"),
            Self::DatacenterId => f.write_str("datacenter_id"),
        }
    }
}

/// All error variants that `snowgen` can emit.
///
/// Sequence exhaustion is never an error: [`next_id`] waits for the next
/// millisecond and [`try_next_id`] reports [`IdGenStatus::Pending`].
///
/// [`next_id`]: crate::SnowflakeGenerator::next_id
/// [`try_next_id`]: crate::SnowflakeGenerator::try_next_id
/// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A generator was constructed with an identifier that does not fit its
    /// bit field. Values are rejected, never truncated.
    #[error("invalid configuration: {field} = {value} exceeds maximum {max}")]
    InvalidConfiguration {
        /// Which identifier was out of range.
        field: Field,
        /// The rejected value.
        value: u64,
        /// The largest value the field accepts.
        max: u64,
    },

    /// A generator was constructed with an epoch whose millisecond count does
    /// not fit in a `u64`.
    #[error("invalid epoch: {millis} ms does not fit in 64 bits")]
    InvalidEpoch {
        /// The rejected epoch, in Unix milliseconds.
        millis: u128,
    },

    /// The time source reported a millisecond earlier than the last one an ID
    /// was issued for.
    ///
    /// The generator state is left untouched, so a later call succeeds once
    /// the clock catches up to `last`.
    #[error("clock moved backwards: now {now} ms is before last issued {last} ms")]
    ClockRewound {
        /// Milliseconds reported by the time source.
        now: u64,
        /// Milliseconds of the most recently issued ID.
        last: u64,
    },

    /// The time source reported a time before the epoch, or one too far past
    /// it to fit the 41-bit timestamp field.
    #[error("clock out of range: {now} ms is not representable from epoch {epoch} ms")]
    ClockOutOfRange {
        /// Milliseconds reported by the time source.
        now: u64,
        /// The generator epoch, in Unix milliseconds.
        epoch: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// When the `parking-lot` feature is enabled, mutexes do not poison, so
    /// this variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for errors a caller can reasonably retry after a delay.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ClockRewound { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
