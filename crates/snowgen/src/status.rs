use crate::SnowflakeId;

/// The outcome of a non-blocking [`SnowflakeGenerator::try_next_id`] call.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was generated.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values for the current
///   millisecond are spent and no ID can be issued until the clock reaches
///   `yield_until`.
///
/// This allows generation loops that must not spin while holding the
/// generator lock, e.g. inside an async executor.
///
/// # Example
///
/// ```
/// use snowgen::{IdGenStatus, SnowflakeGenerator};
///
/// let generator = SnowflakeGenerator::new(1, 1)?;
/// let id = loop {
///     match generator.try_next_id()? {
///         IdGenStatus::Ready { id } => break id,
///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert_eq!(id.worker_id(), 1);
/// # Ok::<(), snowgen::Error>(())
/// ```
///
/// [`SnowflakeGenerator::try_next_id`]: crate::SnowflakeGenerator::try_next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// The time source reading (inclusive, Unix milliseconds) at which
        /// generation may resume.
        yield_until: u64,
    },
}

impl IdGenStatus {
    /// Returns the ID if one was generated.
    pub const fn ready(self) -> Option<SnowflakeId> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }
}
