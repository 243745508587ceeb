//! Clock seam (SPEC_FULL.md §9 REDESIGN): several rules reference
//! wall-clock "now" (off-hours adjustment, alert IDs, cache TTLs). A
//! trait lets tests freeze time instead of racing the real clock.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: the real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock frozen at a fixed instant, with an explicit `advance`
/// method for scenarios that need time to move deterministically.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: std::sync::Arc<parking_lot::Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at: std::sync::Arc::new(parking_lot::Mutex::new(at)),
        }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        *self.at.lock() += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.lock()
    }
}
