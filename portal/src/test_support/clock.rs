//! Clock for tests that need fixed or stepped timestamps.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Clock frozen at a chosen instant until a test moves it.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    /// Clock reading `now` until advanced.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move forward by `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step` does not fit a chrono delta.
    pub fn advance(&self, step: Duration) {
        let Ok(step) = chrono::Duration::from_std(step) else {
            panic!("clock step {step:?} is out of range");
        };
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().into()
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
