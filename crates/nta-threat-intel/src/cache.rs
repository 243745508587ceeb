//! 24-hour TTL lookup cache (SPEC_FULL.md §3, §4.6).

use chrono::{DateTime, Duration, Utc};

pub const CACHE_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    inserted_at: DateTime<Utc>,
}

impl<T: Clone> CacheEntry<T> {
    pub fn new(value: T, now: DateTime<Utc>) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.inserted_at < Duration::hours(CACHE_TTL_HOURS)
    }
}
