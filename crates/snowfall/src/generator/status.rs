use crate::SnowflakeId;

/// Outcome of a single, non-blocking generation attempt.
///
/// Returned by [`SnowflakeGenerator::poll_id`]. [`SnowflakeGenerator::generate`]
/// drives this in a loop and applies the backoff each variant asks for; use
/// `poll_id` directly when you want to schedule the wait yourself (for
/// example, on an async runtime).
///
/// [`SnowflakeGenerator::poll_id`]: crate::SnowflakeGenerator::poll_id
/// [`SnowflakeGenerator::generate`]: crate::SnowflakeGenerator::generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// No ID was generated, try again after `yield_for` milliseconds.
    ///
    /// `1` means the sequence is exhausted for the current millisecond. `0`
    /// means another caller won the race for the state word and the attempt
    /// can be retried immediately.
    Pending {
        /// Milliseconds to wait before retrying.
        yield_for: u64,
    },
    /// The clock reads earlier than the last issued timestamp.
    ClockBehind {
        /// How far behind the clock is, in milliseconds.
        yield_for: u64,
    },
}

impl Poll {
    /// Returns the ID if this attempt produced one.
    #[must_use]
    pub const fn ready(self) -> Option<SnowflakeId> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } | Self::ClockBehind { .. } => None,
        }
    }
}
