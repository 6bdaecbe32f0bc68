use core::fmt;

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21              17 16          12 11             0
///              +--------------+----------------+------------------+--------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter ID (5)| worker ID (5)| sequence (12) |
///              +--------------+----------------+------------------+--------------+---------------+
///              |<------------------------ MSB ------- 64 bits ------- LSB -------------------------->|
/// ```
///
/// IDs compare and hash as their raw `u64`, so sorting IDs from one
/// generator sorts them by issue order.
///
/// # Example
///
/// ```
/// use snowgen::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 7, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const DATACENTER_ID_BITS: u32 = 5;
    pub const WORKER_ID_BITS: u32 = 5;
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 5-bit datacenter ID field. Occupies bits 17 through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;
    pub const DATACENTER_ID_SHIFT: u32 = Self::WORKER_ID_SHIFT + Self::WORKER_ID_BITS;
    pub const TIMESTAMP_SHIFT: u32 = Self::DATACENTER_ID_SHIFT + Self::DATACENTER_ID_BITS;

    /// Packs the four fields into an ID. Each value is masked to its field
    /// width; callers validate ranges beforehand.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = sequence & Self::SEQUENCE_MASK;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Wraps a raw `u64` without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Milliseconds since the generator epoch.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_datacenter_id() -> u64 {
        Self::DATACENTER_ID_MASK
    }

    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns `true` if the reserved high bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) == 0
    }

    /// The Unix time in milliseconds at which this ID was issued, given the
    /// epoch of the generator that issued it.
    pub const fn unix_millis(&self, epoch: u64) -> u64 {
        epoch + self.timestamp()
    }

    /// Zero-padded decimal form (20 digits, the width of `u64::MAX`) so that
    /// lexicographic order matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Binary for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.id, f)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_shifts_are_22_17_12() {
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(SnowflakeId::DATACENTER_ID_SHIFT, 17);
        assert_eq!(SnowflakeId::WORKER_ID_SHIFT, 12);
        assert_eq!(SnowflakeId::max_sequence(), 4095);
        assert_eq!(SnowflakeId::max_worker_id(), 31);
        assert_eq!(SnowflakeId::max_datacenter_id(), 31);
    }

    #[test]
    fn fields_occupy_disjoint_bits() {
        let id = SnowflakeId::from_components(1, 1, 1, 1);
        assert_eq!(id.to_raw(), (1 << 22) | (1 << 17) | (1 << 12) | 1);
    }

    #[test]
    fn max_components_keep_reserved_bit_clear() {
        let id = SnowflakeId::from_components(
            SnowflakeId::max_timestamp(),
            SnowflakeId::max_datacenter_id(),
            SnowflakeId::max_worker_id(),
            SnowflakeId::max_sequence(),
        );
        assert!(id.is_valid());
        assert_eq!(id.to_raw(), i64::MAX as u64);
        assert!(!SnowflakeId::from_raw(u64::MAX).is_valid());
    }

    #[test]
    fn oversized_components_are_masked() {
        let id = SnowflakeId::from_components(0, 32, 33, 4096);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn formats() {
        let id = SnowflakeId::from_components(1, 0, 0, 0);
        assert_eq!(id.to_string(), "4194304");
        assert_eq!(id.to_padded_string(), "00000000000004194304");
        let bits = format!("{id:064b}");
        assert_eq!(bits.len(), 64);
        assert_eq!(bits.find('1'), Some(64 - 23));
        assert_eq!(u64::from(id), 1 << 22);
    }

    #[test]
    fn unix_millis_adds_epoch() {
        let id = SnowflakeId::from_components(250, 0, 0, 0);
        assert_eq!(id.unix_millis(1_602_388_800_000), 1_602_388_800_250);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_native_integer() {
        let id = SnowflakeId::from_components(7, 1, 2, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
