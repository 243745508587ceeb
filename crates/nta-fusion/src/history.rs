//! Alert history with sliding-window eviction (SPEC_FULL.md §9 design note).
//!
//! The original keeps an unbounded per-host list; this keeps only the
//! entries within a configurable window (default 24h), evicted lazily
//! on access.

use chrono::{DateTime, Duration, Utc};
use nta_common::Action;
use std::collections::{HashMap, VecDeque};

pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Repeat-offender threshold: three or more prior entries within the
/// window (SPEC_FULL.md §4.7, adjustment 2).
pub const REPEAT_OFFENDER_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    at: DateTime<Utc>,
    #[allow(dead_code)]
    score: f64,
    #[allow(dead_code)]
    action: Action,
}

#[derive(Debug, Default)]
pub struct AlertHistory {
    window: HashMap<String, VecDeque<HistoryEntry>>,
    window_hours: i64,
}

impl AlertHistory {
    pub fn new() -> Self {
        Self {
            window: HashMap::new(),
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }

    pub fn with_window_hours(window_hours: i64) -> Self {
        Self {
            window: HashMap::new(),
            window_hours,
        }
    }

    fn evict(&mut self, source: &str, now: DateTime<Utc>) {
        if let Some(entries) = self.window.get_mut(source) {
            let cutoff = now - Duration::hours(self.window_hours);
            while entries.front().is_some_and(|e| e.at < cutoff) {
                entries.pop_front();
            }
        }
    }

    pub fn record(&mut self, source: &str, at: DateTime<Utc>, score: f64, action: Action) {
        self.evict(source, at);
        self.window
            .entry(source.to_owned())
            .or_default()
            .push_back(HistoryEntry { at, score, action });
    }

    /// Count of entries for `source` within the window as of `now`.
    pub fn count(&mut self, source: &str, now: DateTime<Utc>) -> usize {
        self.evict(source, now);
        self.window.get(source).map_or(0, VecDeque::len)
    }

    pub fn is_repeat_offender(&mut self, source: &str, now: DateTime<Utc>) -> bool {
        self.count(source, now) >= REPEAT_OFFENDER_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn repeat_offender_after_three_entries() {
        let mut history = AlertHistory::new();
        assert!(!history.is_repeat_offender("10.0.0.1", at(0)));
        history.record("10.0.0.1", at(0), 0.5, Action::MonitorClosely);
        history.record("10.0.0.1", at(1), 0.5, Action::MonitorClosely);
        assert!(!history.is_repeat_offender("10.0.0.1", at(2)));
        history.record("10.0.0.1", at(2), 0.5, Action::MonitorClosely);
        assert!(history.is_repeat_offender("10.0.0.1", at(2)));
    }

    #[test]
    fn entries_outside_window_are_evicted() {
        let mut history = AlertHistory::with_window_hours(24);
        history.record("10.0.0.1", at(0), 0.5, Action::MonitorClosely);
        history.record("10.0.0.1", at(1), 0.5, Action::MonitorClosely);
        history.record("10.0.0.1", at(2), 0.5, Action::MonitorClosely);
        let much_later = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(history.count("10.0.0.1", much_later), 0);
    }
}
