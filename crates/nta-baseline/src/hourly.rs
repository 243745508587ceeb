//! Per-hour-of-day circadian baseline (SPEC_FULL.md §4.5).

use crate::welford::Welford;

const MIN_SAMPLES: u64 = 10;

#[derive(Debug, Clone)]
pub struct HourlyBaseline {
    hours: [Welford; 24],
}

impl Default for HourlyBaseline {
    fn default() -> Self {
        Self {
            hours: [Welford::default(); 24],
        }
    }
}

impl HourlyBaseline {
    pub fn update(&mut self, hour: u8, volume: f64) {
        self.hours[hour as usize % 24].update(volume);
    }

    pub fn welford(&self, hour: u8) -> &Welford {
        &self.hours[hour as usize % 24]
    }

    /// Schedule-sensitive z-score threshold: night shift (02-06) is
    /// stricter, business hours (09-17) looser, otherwise the default.
    fn threshold_for(hour: u8) -> f64 {
        match hour {
            2..=6 => 2.0,
            9..=17 => 5.0,
            _ => 3.0,
        }
    }

    pub fn is_anomalous(&self, hour: u8, volume: f64) -> bool {
        let welford = self.welford(hour);
        if welford.count() < MIN_SAMPLES {
            return false;
        }
        match welford.z_score(volume) {
            Some(z) => z.abs() > Self::threshold_for(hour),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_minimum_samples_before_flagging() {
        let mut baseline = HourlyBaseline::default();
        for _ in 0..5 {
            baseline.update(10, 5.0);
        }
        assert!(!baseline.is_anomalous(10, 500.0));
    }

    #[test]
    fn night_shift_is_stricter_than_business_hours() {
        let mut night = HourlyBaseline::default();
        let mut day = HourlyBaseline::default();
        for i in 0..20 {
            let jitter = if i % 2 == 0 { 4.0 } else { 6.0 };
            night.update(3, jitter);
            day.update(10, jitter);
        }
        // z=4 for both: exceeds the night-shift threshold (2) but not
        // the business-hours threshold (5).
        assert!(night.is_anomalous(3, 9.0));
        assert!(!day.is_anomalous(10, 9.0));
    }
}
