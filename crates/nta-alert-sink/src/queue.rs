//! Bounded overflow queue for alerts that exhausted delivery retries
//! (SPEC_FULL.md §4.9: "overflow parks alerts in a bounded in-memory
//! queue and drops the oldest on pressure, with a dropped-alert counter").

use nta_common::Alert;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

pub struct OverflowQueue {
    capacity: usize,
    entries: VecDeque<Alert>,
    dropped: AtomicU64,
}

impl OverflowQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            dropped: AtomicU64::new(0),
        }
    }

    /// Push an alert, dropping the oldest queued entry if at capacity.
    pub fn push(&mut self, alert: Alert) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(capacity = self.capacity, "alert overflow queue dropped oldest entry");
        }
        self.entries.push_back(alert);
    }

    pub fn drain(&mut self) -> Vec<Alert> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
