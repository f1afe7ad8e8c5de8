//! Time source for blocking waits

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Wall clock plus the ability to block
///
/// The destruction driver only waits through this trait, so tests can run
/// rate-limit scenarios without sleeping.
pub trait Pause {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Block the calling thread
    fn pause(&mut self, duration: Duration);
}

/// Real wall clock and `thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPause;

impl Pause for SystemPause {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Time left until `deadline`, zero if it already passed
pub fn until(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Duration {
    (deadline - now).to_std().unwrap_or(Duration::ZERO)
}
