//! Finalizes per-hour connection-volume samples for C5's hourly
//! baseline (SPEC_FULL.md §4.5): the hourly baseline wants one volume
//! sample per completed hour-of-day bucket, not one sample per record.

use chrono::{DateTime, Timelike, Utc};
use nta_baseline::BaselineLearner;

#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyBucketTracker {
    current_bucket: Option<(i64, u8)>,
    current_count: u64,
}

impl HourlyBucketTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record's timestamp into the running bucket, finalizing
    /// the previous bucket into `learner` on rollover. Returns the
    /// in-progress count for the record's own hour, for a same-tick
    /// anomaly check against history.
    pub fn observe(&mut self, at: DateTime<Utc>, learner: &mut BaselineLearner) -> u64 {
        let day = at.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp() / 86_400;
        let hour = at.hour() as u8;
        let bucket = (day, hour);

        match self.current_bucket {
            Some(b) if b == bucket => {}
            Some((_, prev_hour)) => {
                learner.update_hourly(prev_hour, self.current_count as f64);
                self.current_bucket = Some(bucket);
                self.current_count = 0;
            }
            None => {
                self.current_bucket = Some(bucket);
                self.current_count = 0;
            }
        }

        self.current_count += 1;
        self.current_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rollover_finalizes_previous_hour() {
        let mut tracker = HourlyBucketTracker::new();
        let mut learner = BaselineLearner::new();

        let hour_10 = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        for _ in 0..5 {
            tracker.observe(hour_10, &mut learner);
        }
        assert_eq!(learner.hourly.welford(10).count(), 0);

        let hour_11 = Utc.with_ymd_and_hms(2026, 1, 1, 11, 0, 0).unwrap();
        tracker.observe(hour_11, &mut learner);
        assert_eq!(learner.hourly.welford(10).count(), 1);
        assert_eq!(learner.hourly.welford(10).mean(), 5.0);
    }
}
