//! Thin C1 wrapper around `nta_common::parse_record`: folds the parse
//! outcome into the pipeline's metrics counters (SPEC_FULL.md §4.1,
//! §4.9 failure semantics) before handing a recognized record onward.

use crate::metrics::PipelineMetrics;
use nta_common::{parse_record, Classification, Record};
use tracing::warn;

/// Classify one input line, recording the outcome in `metrics`.
/// Returns `None` for both ignored and malformed lines — the stream
/// continues either way; only the counters and, for malformed lines, a
/// warning event distinguish them.
pub fn classify(line: &str, metrics: &PipelineMetrics) -> Option<Record> {
    metrics.record_ingested();
    match parse_record(line) {
        Ok(Classification::Recognized(record)) => Some(record),
        Ok(Classification::Ignored) => {
            metrics.record_ignored();
            None
        }
        Err(err) => {
            metrics.record_parse_failure();
            warn!(error = %err, "dropping malformed record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_line_returns_record() {
        let metrics = PipelineMetrics::new();
        let line = r#"{"_path":"conn","ts":1.0,"id.orig_h":"10.0.0.1","id.resp_h":"10.0.0.2","id.orig_p":1,"id.resp_p":445}"#;
        let record = classify(line, &metrics);
        assert!(record.is_some());
        assert_eq!(metrics.records_ingested(), 1);
        assert_eq!(metrics.parse_failures(), 0);
    }

    #[test]
    fn unknown_path_is_ignored_not_failed() {
        let metrics = PipelineMetrics::new();
        let line = r#"{"_path":"http","ts":1.0,"id.orig_h":"a","id.resp_h":"b","id.orig_p":1,"id.resp_p":2}"#;
        assert!(classify(line, &metrics).is_none());
        assert_eq!(metrics.records_ignored(), 1);
        assert_eq!(metrics.parse_failures(), 0);
    }

    #[test]
    fn malformed_line_counts_as_parse_failure() {
        let metrics = PipelineMetrics::new();
        assert!(classify("not json", &metrics).is_none());
        assert_eq!(metrics.parse_failures(), 1);
    }
}
