//! Phase-organized metrics for the consolidation pipeline
//!
//! Calls go through the `metrics` facade. This crate installs no recorder, so
//! they are no-ops unless the embedding process installs one.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Normalize metrics
    NormalizeRecordsProduced,
    NormalizeSourcesComplete,
    NormalizeSourcesIncomplete,
    NormalizeSourcesFailed,
    NormalizeDuration,

    // Consolidate metrics
    ConsolidateRecordsIn,
    ConsolidateEntriesOut,
    ConsolidateUntitledEntries,
    ConsolidateDuration,

    // Serialize metrics
    SerializeDocumentsWritten,
    SerializeWriteErrors,
    SerializeDocumentBytes,
}

impl MetricName {
    /// Get the metric name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRecordsProduced => "rc_normalize_records_produced_total",
            MetricName::NormalizeSourcesComplete => "rc_normalize_sources_complete_total",
            MetricName::NormalizeSourcesIncomplete => "rc_normalize_sources_incomplete_total",
            MetricName::NormalizeSourcesFailed => "rc_normalize_sources_failed_total",
            MetricName::NormalizeDuration => "rc_normalize_duration_seconds",

            MetricName::ConsolidateRecordsIn => "rc_consolidate_records_in_total",
            MetricName::ConsolidateEntriesOut => "rc_consolidate_entries_out",
            MetricName::ConsolidateUntitledEntries => "rc_consolidate_untitled_entries",
            MetricName::ConsolidateDuration => "rc_consolidate_duration_seconds",

            MetricName::SerializeDocumentsWritten => "rc_serialize_documents_written_total",
            MetricName::SerializeWriteErrors => "rc_serialize_write_errors_total",
            MetricName::SerializeDocumentBytes => "rc_serialize_document_bytes",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod normalize {
    use super::MetricName;

    /// Record a complete outcome and how many records it produced
    pub fn records_normalized(format: &'static str, count: usize) {
        ::metrics::counter!(MetricName::NormalizeSourcesComplete.as_str(), "format" => format)
            .increment(1);
        ::metrics::counter!(MetricName::NormalizeRecordsProduced.as_str(), "format" => format)
            .increment(count as u64);
    }

    /// Record a source whose anchor was absent
    pub fn source_incomplete(format: &'static str) {
        ::metrics::counter!(MetricName::NormalizeSourcesIncomplete.as_str(), "format" => format)
            .increment(1);
    }

    pub fn source_failed(format: &'static str) {
        ::metrics::counter!(MetricName::NormalizeSourcesFailed.as_str(), "format" => format)
            .increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::NormalizeDuration.as_str()).record(secs);
    }
}

pub mod consolidate {
    use super::MetricName;

    /// Record the totals of one consolidation pass
    pub fn pass_completed(records_in: usize, entries_out: usize, untitled: usize) {
        ::metrics::counter!(MetricName::ConsolidateRecordsIn.as_str()).increment(records_in as u64);
        ::metrics::gauge!(MetricName::ConsolidateEntriesOut.as_str()).set(entries_out as f64);
        ::metrics::gauge!(MetricName::ConsolidateUntitledEntries.as_str()).set(untitled as f64);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::ConsolidateDuration.as_str()).record(secs);
    }
}

pub mod serialize {
    use super::MetricName;

    pub fn document_written(bytes: usize) {
        ::metrics::counter!(MetricName::SerializeDocumentsWritten.as_str()).increment(1);
        ::metrics::histogram!(MetricName::SerializeDocumentBytes.as_str()).record(bytes as f64);
    }

    pub fn write_failed() {
        ::metrics::counter!(MetricName::SerializeWriteErrors.as_str()).increment(1);
    }
}
