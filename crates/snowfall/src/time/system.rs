use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The system wall clock.
///
/// Unlike a monotonic timer this follows NTP steps and manual adjustments,
/// which is what keeps timestamps comparable across processes. Backward steps
/// are handled by the generator, not here.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    /// A clock set before 1970 reads as `0`, which a generator then treats as
    /// a rollback.
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DISCORD_EPOCH;

    #[test]
    fn system_clock_tracks_wall_time() {
        let expected = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let now = SystemClock.current_millis();
        assert!(now >= expected);
        assert!(now - expected < 1_000);
        assert!(u128::from(now) > DISCORD_EPOCH.as_millis());
    }
}
