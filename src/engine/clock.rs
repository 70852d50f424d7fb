//! Monotonic UTC timestamps with a faked microsecond field.
//!
//! The engine has no sub-second ordering source of its own, so the
//! microsecond component is the number of timestamps issued during the
//! current wall-clock second. Timestamps issued in program order therefore
//! compare lexicographically in program order, as long as the wall clock
//! does not regress.

use chrono::Utc;

/// Issues strictly increasing `YYYY-MM-DDTHH:MM:SS.ffffffZ` timestamps.
///
/// The counter resets whenever the wall-clock second changes; across
/// seconds, monotonicity follows the wall clock itself.
#[derive(Debug)]
pub struct Clock {
    last_second: i64,
    fake_micro: u32,
}

impl Clock {
    /// Create a clock that has issued no timestamps yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_second: i64::MIN,
            fake_micro: 0,
        }
    }

    /// The next timestamp. Consumes one tick of the per-second counter.
    pub fn now(&mut self) -> String {
        let now = Utc::now();
        let second = now.timestamp();

        if second == self.last_second {
            self.fake_micro += 1;
        } else {
            self.last_second = second;
            self.fake_micro = 0;
        }

        format!(
            "{}.{:06}Z",
            now.format("%Y-%m-%dT%H:%M:%S"),
            self.fake_micro
        )
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
