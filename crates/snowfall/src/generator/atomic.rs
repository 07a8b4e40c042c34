use core::{cmp, fmt, time::Duration};
use std::{thread, time::Instant};

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result, SnowflakeId, SystemClock, TimeSource,
    generator::Poll,
    id::layout::{NODE_ID, SEQUENCE, TIMESTAMP},
};

/// How long [`SnowflakeGenerator::generate`] waits for a clock that moved
/// backwards to catch up before failing with [`Error::ClockRollback`].
pub const CLOCK_ROLLBACK_TOLERANCE: Duration = Duration::from_millis(15);

/// Interval at which the clock is re-read while waiting out a rollback.
pub const CLOCK_ROLLBACK_POLL_INTERVAL: Duration = Duration::from_millis(1);

// The state word is `(timestamp << 12) | sequence`; the node id is constant
// per generator and is only merged in when an ID is returned.
#[inline]
const fn pack_state(timestamp: u64, sequence: u64) -> u64 {
    (timestamp << SEQUENCE.width) | sequence
}

#[inline]
const fn unpack_state(state: u64) -> (u64, u64) {
    (state >> SEQUENCE.width, state & SEQUENCE.max())
}

/// A lock-free Snowflake ID generator suitable for multi-threaded environments.
///
/// The last issued timestamp and sequence live in a single [`AtomicU64`]; each
/// ID is claimed by exactly one successful compare-and-swap on it, which is the
/// point of total order across concurrent callers. Losers re-read the clock and
/// the state and try again.
///
/// ## Features
/// - ✅ Thread-safe, no locks
/// - ✅ Monotonic per instance: `(timestamp, sequence)` never decreases in CAS
///   order
/// - ❌ No persistence: state starts empty on every construction
///
/// ## Caveats
/// Uniqueness across generators relies on every generator having a distinct
/// node id and on their clocks being roughly synchronized. Assigning node ids
/// is the caller's job.
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    node_id_shifted: u64,
    epoch: u64,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator for `node_id` that reads the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `node_id` does not fit in 10 bits
    /// (i.e. is 1024 or larger).
    ///
    /// # Example
    /// ```
    /// use snowfall::{Error, SnowflakeGenerator, TWITTER_EPOCH};
    ///
    /// assert!(SnowflakeGenerator::new(1023, TWITTER_EPOCH).is_ok());
    /// assert_eq!(
    ///     SnowflakeGenerator::new(1024, TWITTER_EPOCH).unwrap_err(),
    ///     Error::InvalidNodeId { node_id: 1024 },
    /// );
    /// ```
    pub fn new(node_id: u64, epoch: Duration) -> Result<Self> {
        Self::with_clock(node_id, epoch, SystemClock)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `node_id` that reads time from `time`.
    ///
    /// The internal state starts zeroed, so the first ID carries sequence `0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `node_id` does not fit in 10 bits.
    pub fn with_clock(node_id: u64, epoch: Duration, time: T) -> Result<Self> {
        Self::from_components(0, node_id, 0, epoch, time)
    }

    /// Creates a generator whose state is preloaded with the given last
    /// issued `timestamp` and `sequence`.
    ///
    /// This is primarily useful for tests and for resuming from a known high
    /// water mark. In typical use cases, prefer [`Self::with_clock`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNodeId`] if `node_id` does not fit in 10 bits
    /// - [`Error::FieldOverflow`] if `timestamp` or `sequence` is out of range
    pub fn from_components(
        timestamp: u64,
        node_id: u64,
        sequence: u64,
        epoch: Duration,
        time: T,
    ) -> Result<Self> {
        let Ok(node_id_shifted) = NODE_ID.try_place(node_id) else {
            return Err(Error::InvalidNodeId { node_id });
        };
        TIMESTAMP.try_place(timestamp)?;
        SEQUENCE.try_place(sequence)?;

        let epoch = u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX);
        let initial = pack_state(timestamp, sequence);

        #[cfg(feature = "tracing")]
        tracing::debug!(node_id, epoch, "created snowflake generator");

        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial),
            node_id_shifted,
            epoch,
            time,
        })
    }

    /// The node id stamped into every ID from this generator.
    pub const fn node_id(&self) -> u64 {
        NODE_ID.extract(self.node_id_shifted)
    }

    /// The epoch timestamps are measured from.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch)
    }

    /// Generates the next ID, blocking briefly if it has to.
    ///
    /// Contention on the state word is retried immediately. When the current
    /// millisecond's 4096 sequence numbers are used up, the call sleeps until
    /// the next millisecond. When the clock reads earlier than the last issued
    /// timestamp, the clock is polled every
    /// [`CLOCK_ROLLBACK_POLL_INTERVAL`] for up to
    /// [`CLOCK_ROLLBACK_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRollback`] if the clock is still behind once the
    ///   tolerance has elapsed. A past timestamp is never reused.
    /// - [`Error::TimestampOverflow`] if the time since the epoch no longer
    ///   fits in 41 bits.
    ///
    /// # Example
    /// ```
    /// use snowfall::{SnowflakeGenerator, DISCORD_EPOCH};
    ///
    /// let generator = SnowflakeGenerator::new(1, DISCORD_EPOCH).unwrap();
    /// let a = generator.generate().unwrap();
    /// let b = generator.generate().unwrap();
    /// assert!(a < b);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        let mut rollback_deadline: Option<Instant> = None;

        loop {
            match self.poll_id()? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { yield_for: 0 } => core::hint::spin_loop(),
                Poll::Pending { yield_for } => thread::sleep(Duration::from_millis(yield_for)),
                Poll::ClockBehind { yield_for } => {
                    let deadline = *rollback_deadline.get_or_insert_with(|| {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            behind_by = yield_for,
                            node_id = self.node_id(),
                            "clock moved backwards, waiting for it to catch up"
                        );
                        Instant::now() + CLOCK_ROLLBACK_TOLERANCE
                    });

                    if Instant::now() >= deadline {
                        #[cfg(feature = "tracing")]
                        tracing::error!(
                            behind_by = yield_for,
                            node_id = self.node_id(),
                            "clock rollback exceeded tolerance"
                        );
                        return Err(Error::ClockRollback {
                            behind_by: yield_for,
                        });
                    }
                    thread::sleep(CLOCK_ROLLBACK_POLL_INTERVAL);
                }
            }
        }
    }

    /// Like [`Self::generate`], but panics instead of returning an error.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::generate`] fails.
    #[track_caller]
    pub fn must_generate(&self) -> SnowflakeId {
        match self.generate() {
            Ok(id) => id,
            Err(e) => panic!("failed to generate snowflake: {e}"),
        }
    }

    /// Makes exactly one attempt at generating an ID, never blocking.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID was claimed
    /// - `Ok(Poll::Pending { yield_for: 1 })`: the sequence is exhausted for
    ///   this millisecond
    /// - `Ok(Poll::Pending { yield_for: 0 })`: another caller won the CAS
    /// - `Ok(Poll::ClockBehind { yield_for })`: the clock reads `yield_for`
    ///   milliseconds before the last issued timestamp
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the time since the epoch no
    /// longer fits in 41 bits.
    pub fn poll_id(&self) -> Result<Poll> {
        let now = self.time.current_millis();

        let current = self.state.load(Ordering::Relaxed);
        let (last_ts, last_seq) = unpack_state(current);

        let Some(ts) = now.checked_sub(self.epoch) else {
            // Before the epoch is behind any timestamp we could have issued.
            return Ok(Self::cold_clock_behind(
                (self.epoch - now).saturating_add(last_ts),
            ));
        };

        let (next_ts, next_seq) = match ts.cmp(&last_ts) {
            cmp::Ordering::Equal => {
                if last_seq < SEQUENCE.max() {
                    (last_ts, last_seq + 1)
                } else {
                    return Ok(Poll::Pending { yield_for: 1 });
                }
            }
            cmp::Ordering::Greater => {
                if ts > TIMESTAMP.max() {
                    return Err(Self::cold_timestamp_overflow(ts));
                }
                (ts, 0)
            }
            cmp::Ordering::Less => return Ok(Self::cold_clock_behind(last_ts - ts)),
        };

        if self
            .state
            .compare_exchange(
                current,
                pack_state(next_ts, next_seq),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            let raw = (next_ts << TIMESTAMP.shift) | self.node_id_shifted | next_seq;
            Ok(Poll::Ready {
                id: SnowflakeId::from_raw(raw),
            })
        } else {
            // CAS failed - another thread won the race. Yield 0 to retry
            // immediately.
            Ok(Poll::Pending { yield_for: 0 })
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(yield_for: u64) -> Poll {
        Poll::ClockBehind { yield_for }
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64) -> Error {
        Error::TimestampOverflow { timestamp }
    }
}

impl<T> fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (timestamp, sequence) = unpack_state(self.state.load(Ordering::Relaxed));
        f.debug_struct("SnowflakeGenerator")
            .field("node_id", &self.node_id())
            .field("epoch", &self.epoch)
            .field("timestamp", &timestamp)
            .field("sequence", &sequence)
            .finish_non_exhaustive()
    }
}
