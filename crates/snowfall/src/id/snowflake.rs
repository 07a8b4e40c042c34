use core::{fmt, str::FromStr, time::Duration};

use crate::{
    Error, Result,
    id::layout::{self, NODE_ID, RESERVED_MASK, SEQUENCE, TIMESTAMP},
};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) |   node ID (10)  | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// Ordering follows the raw integer, which is timestamp first, then node id,
/// then sequence.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "diesel",
    derive(diesel::AsExpression, diesel::FromSqlRow),
    diesel(sql_type = diesel::sql_types::BigInt)
)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = TIMESTAMP.max();

    /// Bitmask for extracting the 10-bit node ID field. Occupies bits 12
    /// through 21.
    pub const NODE_ID_MASK: u64 = NODE_ID.max();

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = SEQUENCE.max();

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = TIMESTAMP.shift;

    /// Number of bits to shift the node ID to its correct position (bit 12).
    pub const NODE_ID_SHIFT: u32 = NODE_ID.shift;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = SEQUENCE.shift;

    /// Builds an ID from its components, masking each one to its field width.
    ///
    /// Out-of-range components lose their high bits but never spill into a
    /// neighbouring field. Use [`Self::try_from_components`] to reject them
    /// instead.
    #[must_use]
    pub const fn from_components(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        Self {
            id: TIMESTAMP.place(timestamp) | NODE_ID.place(node_id) | SEQUENCE.place(sequence),
        }
    }

    /// Builds an ID from its components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOverflow`] if any component is wider than its
    /// field.
    pub const fn try_from_components(timestamp: u64, node_id: u64, sequence: u64) -> Result<Self> {
        match layout::pack(timestamp, node_id, sequence) {
            Ok(id) => Ok(Self { id }),
            Err(e) => Err(e),
        }
    }

    /// Wraps a raw integer without validation.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// The packed integer.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// The packed integer as the signed value stored in SQL `BIGINT` columns.
    #[must_use]
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Wraps a signed integer, rejecting values with the reserved bit set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeOverflow`] for negative values.
    pub const fn try_from_i64(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(Error::DecodeOverflow { value });
        }
        Ok(Self { id: value as u64 })
    }

    /// Returns `true` if the reserved bit is clear.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.id & RESERVED_MASK == 0
    }

    /// Returns a copy with the reserved bit cleared.
    #[must_use]
    pub const fn into_valid(self) -> Self {
        Self {
            id: self.id & !RESERVED_MASK,
        }
    }

    /// Milliseconds since the generator's epoch.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        TIMESTAMP.extract(self.id)
    }

    /// The node that minted this ID.
    #[must_use]
    pub const fn node_id(&self) -> u64 {
        NODE_ID.extract(self.id)
    }

    /// Position of this ID within its millisecond.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        SEQUENCE.extract(self.id)
    }

    /// All three components as `(timestamp, node_id, sequence)`.
    #[must_use]
    pub const fn components(&self) -> (u64, u64, u64) {
        layout::unpack(self.id)
    }

    #[must_use]
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    #[must_use]
    pub const fn max_node_id() -> u64 {
        Self::NODE_ID_MASK
    }

    #[must_use]
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns true if the sequence can be incremented within the same
    /// millisecond.
    #[must_use]
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Absolute creation time in milliseconds since the Unix epoch, given the
    /// epoch the ID was generated against.
    #[must_use]
    pub fn unix_millis(&self, epoch: Duration) -> u128 {
        epoch.as_millis() + u128::from(self.timestamp())
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts the same
    /// way as the IDs themselves.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s.parse()?;
        Self::try_from_i64(value)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_i64()
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::try_from_i64(value)
    }
}
