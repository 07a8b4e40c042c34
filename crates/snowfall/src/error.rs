use core::{num::ParseIntError, str::Utf8Error};

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowfall` can emit.
///
/// Generation only fails with [`Error::ClockRollback`] or
/// [`Error::TimestampOverflow`]; everything else comes from construction or
/// from decoding an external representation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The node id does not fit in the 10-bit node field.
    #[error("node id {node_id} exceeds the maximum of {max}", max = crate::SnowflakeId::max_node_id())]
    InvalidNodeId {
        /// The rejected node id.
        node_id: u64,
    },

    /// The wall clock moved backwards and did not recover within the
    /// tolerated window.
    #[error("clock moved backwards by {behind_by}ms")]
    ClockRollback {
        /// Milliseconds between the last issued timestamp and the clock at
        /// the moment generation gave up.
        behind_by: u64,
    },

    /// The time since the epoch no longer fits in the 41-bit timestamp field.
    #[error("relative timestamp {timestamp}ms exceeds the maximum of {max}ms", max = crate::SnowflakeId::max_timestamp())]
    TimestampOverflow {
        /// Milliseconds since the epoch at the time of the failed attempt.
        timestamp: u64,
    },

    /// A component passed to strict packing is wider than its bit field.
    #[error("{field} value {value} exceeds the maximum of {max}")]
    FieldOverflow {
        /// Name of the bit field: `timestamp`, `node id` or `sequence`.
        field: &'static str,
        /// The rejected component.
        value: u64,
        /// Largest value the field can hold.
        max: u64,
    },

    /// A SQL value of a kind that cannot hold a snowflake was scanned.
    #[error("unsupported scan type: {kind}")]
    UnsupportedScanType {
        /// Kind of the scanned value, as reported by [`crate::SqlValue::kind`].
        kind: &'static str,
    },

    /// The input is not a decimal integer.
    #[error("invalid decimal snowflake: {0}")]
    InvalidDigits(#[from] ParseIntError),

    /// The input bytes are not valid UTF-8 (and therefore not ASCII digits).
    #[error("invalid snowflake bytes: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// The decoded integer sets the reserved sign bit.
    #[error("decoded value {value} is not a valid snowflake")]
    DecodeOverflow {
        /// The decoded integer.
        value: i64,
    },
}
