use core::{cmp::Ordering, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DEFAULT_EPOCH, Error, Field, IdGenStatus, Result, SnowflakeId, SystemClock, TimeSource,
    generator::{Mutex, MutexGuard},
};

/// Mutable generator state, guarded by the generator lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    /// Time source reading (Unix ms) of the most recently issued ID; `0`
    /// before first use.
    pub(crate) last_timestamp: u64,
    /// Sequence of the most recently issued ID within `last_timestamp`.
    pub(crate) sequence: u64,
}

/// A lock-based Snowflake ID generator.
///
/// Each instance owns one `(datacenter_id, worker_id)` slot of the ID space.
/// Generation runs entirely under a single mutex, so the generator can be
/// shared across threads by reference or through an [`Arc`]; at most one
/// thread composes an ID at a time.
///
/// IDs from one generator strictly increase as long as the time source does
/// not go backwards. Distinct slots never collide, but IDs from different
/// generators are only ordered up to their millisecond.
///
/// The lock is `std::sync::Mutex` by default and `parking_lot::Mutex` with
/// the `parking-lot` feature.
///
/// # Example
///
/// ```
/// use snowgen::SnowflakeGenerator;
///
/// let generator = SnowflakeGenerator::new(3, 1)?;
/// let a = generator.next_id()?;
/// let b = generator.next_id()?;
/// assert!(a < b);
/// assert_eq!((b.datacenter_id(), b.worker_id()), (1, 3));
/// # Ok::<(), snowgen::Error>(())
/// ```
///
/// [`Arc`]: std::sync::Arc
#[derive(Debug)]
pub struct SnowflakeGenerator<T = SystemClock> {
    worker_id: u64,
    datacenter_id: u64,
    epoch: u64,
    pub(crate) state: Mutex<State>,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator for the given slot, reading the wall clock and
    /// using [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `worker_id` or
    /// `datacenter_id` is greater than 31.
    pub fn new(worker_id: u64, datacenter_id: u64) -> Result<Self> {
        Self::with_time(worker_id, datacenter_id, SystemClock)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for the given slot that reads time from `time`,
    /// using [`DEFAULT_EPOCH`].
    ///
    /// The state starts zeroed (`last_timestamp = 0`, `sequence = 0`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `worker_id` or
    /// `datacenter_id` is greater than 31.
    pub fn with_time(worker_id: u64, datacenter_id: u64, time: T) -> Result<Self> {
        Self::with_time_and_epoch(worker_id, datacenter_id, time, DEFAULT_EPOCH)
    }

    /// Creates a generator for the given slot with a custom epoch, given as a
    /// duration since 1970-01-01 UTC.
    ///
    /// The epoch is fixed for the lifetime of the generator. Every generator
    /// sharing an ID space must use the same one.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `worker_id` or `datacenter_id` is
    ///   greater than 31.
    /// - [`Error::InvalidEpoch`] if `epoch` in milliseconds exceeds
    ///   `u64::MAX`.
    pub fn with_time_and_epoch(
        worker_id: u64,
        datacenter_id: u64,
        time: T,
        epoch: Duration,
    ) -> Result<Self> {
        check_field(Field::WorkerId, worker_id, SnowflakeId::max_worker_id())?;
        check_field(
            Field::DatacenterId,
            datacenter_id,
            SnowflakeId::max_datacenter_id(),
        )?;
        let millis = epoch.as_millis();
        let epoch = u64::try_from(millis).map_err(|_| Error::InvalidEpoch { millis })?;

        Ok(Self {
            worker_id,
            datacenter_id,
            epoch,
            state: Mutex::new(State::default()),
            time,
        })
    }

    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// The epoch in Unix milliseconds.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Generates the next ID, waiting for the next millisecond if this one
    /// has already issued 4096 IDs.
    ///
    /// The clock is read, compared and the ID composed under the generator
    /// lock. When the sequence wraps, the calling thread spins on the time
    /// source (still holding the lock) until it reports a millisecond past
    /// the last one. There is no timeout: a time source that stalls stalls
    /// this call.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRewound`] if the time source is behind the last issued
    ///   millisecond. No ID is issued and the state is unchanged.
    /// - [`Error::ClockOutOfRange`] if the time is before the epoch or past
    ///   the 41-bit timestamp horizon.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (std mutex only).
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "trace",
            skip(self),
            fields(worker_id = self.worker_id, datacenter_id = self.datacenter_id)
        )
    )]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        let last = state.last_timestamp;
        let mut now = self.time.current_millis();

        if now < last {
            return Err(Self::cold_clock_rewound(now, last));
        }
        let mut offset = self.offset(now)?;

        let sequence = if now == last {
            let sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
            if sequence == 0 {
                now = self.til_next_millis(last);
                offset = self.offset(now)?;
            }
            sequence
        } else {
            0
        };

        state.last_timestamp = now;
        state.sequence = sequence;

        Ok(self.compose(offset, sequence))
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// Behaves like [`Self::next_id`], except that an exhausted millisecond
    /// returns [`IdGenStatus::Pending`] immediately (and leaves the state
    /// untouched) instead of spinning under the lock.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "trace",
            skip(self),
            fields(worker_id = self.worker_id, datacenter_id = self.datacenter_id)
        )
    )]
    pub fn try_next_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock()?;
        let last = state.last_timestamp;
        let now = self.time.current_millis();

        match now.cmp(&last) {
            Ordering::Less => Err(Self::cold_clock_rewound(now, last)),
            Ordering::Equal => {
                if state.sequence >= SnowflakeId::max_sequence() {
                    return Ok(Self::cold_sequence_exhausted(last));
                }
                let offset = self.offset(now)?;
                state.sequence += 1;
                Ok(IdGenStatus::Ready {
                    id: self.compose(offset, state.sequence),
                })
            }
            Ordering::Greater => {
                let offset = self.offset(now)?;
                state.last_timestamp = now;
                state.sequence = 0;
                Ok(IdGenStatus::Ready {
                    id: self.compose(offset, 0),
                })
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Milliseconds between the epoch and `now`, if they fit the timestamp
    /// field.
    fn offset(&self, now: u64) -> Result<u64> {
        match now.checked_sub(self.epoch) {
            Some(offset) if offset <= SnowflakeId::max_timestamp() => Ok(offset),
            _ => Err(Error::ClockOutOfRange {
                now,
                epoch: self.epoch,
            }),
        }
    }

    fn til_next_millis(&self, last: u64) -> u64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(last, "sequence exhausted, waiting for next millisecond");

        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    const fn compose(&self, offset: u64, sequence: u64) -> SnowflakeId {
        SnowflakeId::from_components(offset, self.datacenter_id, self.worker_id, sequence)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_rewound(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, behind_ms = last - now, "clock moved backwards");

        Error::ClockRewound { now, last }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(last: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_until: last + 1,
        }
    }
}

fn check_field(field: Field, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::InvalidConfiguration { field, value, max });
    }
    Ok(())
}
