use core::time::Duration;

use crate::{Result, SnowflakeGenerator, SystemClock, TWITTER_EPOCH, TimeSource};

/// Declarative description of a generator, typically loaded from a service's
/// configuration file.
///
/// Both fields are optional when deserializing: the node id defaults to `0`
/// and the epoch to [`TWITTER_EPOCH`]. Validation happens in [`Self::build`],
/// not while deserializing.
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use snowfall::SnowflakeConfig;
///
/// let config: SnowflakeConfig =
///     serde_json::from_str(r#"{"node_id": 12, "epoch_millis": 1420070400000}"#).unwrap();
/// let generator = config.build().unwrap();
/// assert_eq!(generator.node_id(), 12);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnowflakeConfig {
    /// Node id stamped into every ID. Must be below 1024.
    pub node_id: u64,
    /// Epoch in milliseconds since the Unix epoch.
    pub epoch_millis: u64,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            epoch_millis: saturating_millis(TWITTER_EPOCH),
        }
    }
}

impl SnowflakeConfig {
    /// Epochs past `u64::MAX` milliseconds are clamped to `u64::MAX`.
    pub const fn new(node_id: u64, epoch: Duration) -> Self {
        Self {
            node_id,
            epoch_millis: saturating_millis(epoch),
        }
    }

    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }

    /// Builds a generator that reads the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNodeId`] if the node id does not fit in
    /// 10 bits.
    pub fn build(&self) -> Result<SnowflakeGenerator<SystemClock>> {
        self.build_with_clock(SystemClock)
    }

    /// Builds a generator that reads time from `time`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNodeId`] if the node id does not fit in
    /// 10 bits.
    pub fn build_with_clock<T: TimeSource>(&self, time: T) -> Result<SnowflakeGenerator<T>> {
        SnowflakeGenerator::with_clock(self.node_id, self.epoch(), time)
    }
}

const fn saturating_millis(epoch: Duration) -> u64 {
    let millis = epoch.as_millis();
    if millis > u64::MAX as u128 {
        u64::MAX
    } else {
        millis as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DISCORD_EPOCH, Error};

    #[test]
    fn default_uses_twitter_epoch() {
        let config = SnowflakeConfig::default();
        assert_eq!(config.node_id, 0);
        assert_eq!(config.epoch(), TWITTER_EPOCH);
    }

    #[test]
    fn new_clamps_oversized_epoch() {
        assert_eq!(SnowflakeConfig::new(0, Duration::MAX).epoch_millis, u64::MAX);
        assert_eq!(
            SnowflakeConfig::new(0, Duration::from_millis(u64::MAX)).epoch_millis,
            u64::MAX
        );
        assert_eq!(
            SnowflakeConfig::new(0, DISCORD_EPOCH).epoch_millis,
            1_420_070_400_000
        );
    }

    #[test]
    fn build_validates_node_id() {
        let generator = SnowflakeConfig::new(1023, DISCORD_EPOCH).build().unwrap();
        assert_eq!(generator.node_id(), 1023);
        assert_eq!(generator.epoch(), DISCORD_EPOCH);

        assert_eq!(
            SnowflakeConfig::new(1024, DISCORD_EPOCH).build().unwrap_err(),
            Error::InvalidNodeId { node_id: 1024 }
        );
    }

    #[test]
    fn build_with_clock_uses_given_time() {
        struct FixedTime;
        impl TimeSource for FixedTime {
            fn current_millis(&self) -> u64 {
                1_420_070_400_000 + 77
            }
        }

        let generator = SnowflakeConfig::new(5, DISCORD_EPOCH)
            .build_with_clock(FixedTime)
            .unwrap();
        let id = generator.generate().unwrap();
        assert_eq!(id.timestamp(), 77);
        assert_eq!(id.node_id(), 5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_defaults() {
        let config: SnowflakeConfig = serde_json::from_str(r#"{"node_id": 9}"#).unwrap();
        assert_eq!(config, SnowflakeConfig::new(9, TWITTER_EPOCH));

        let config: SnowflakeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SnowflakeConfig::default());

        assert!(serde_json::from_str::<SnowflakeConfig>(r#"{"node":1}"#).is_err());
    }
}
