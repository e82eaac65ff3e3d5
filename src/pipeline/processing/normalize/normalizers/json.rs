use serde_json::Value;
use tracing::debug;

use super::base::{FormatNormalizer, NormalizerUtils};
use crate::constants;
use crate::domain::NormalizedRecord;
use crate::pipeline::processing::normalize::{NormalizeOutcome, SourceDocument, SourceFormat};

/// Adapter for JSON feeds shaped as `{"scores": [{"id": 1, "note": 8}, ...]}`.
/// JSON sources carry no year.
pub struct JsonNormalizer {
    array_key: String,
}

impl JsonNormalizer {
    pub fn new() -> Self {
        Self::with_array_key(constants::DEFAULT_JSON_ANCHOR)
    }

    pub fn with_array_key(array_key: impl Into<String>) -> Self {
        Self {
            array_key: array_key.into(),
        }
    }

    /// Ids may be JSON integers or strings holding an integer
    fn read_id(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => NormalizerUtils::parse_id(s),
            _ => None,
        }
    }

    fn read_score(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => NormalizerUtils::parse_score(s),
            _ => None,
        }
    }

    fn read_entry(entry: &Value) -> Option<NormalizedRecord> {
        let id = Self::read_id(entry.get("id")?)?;
        let score = Self::read_score(entry.get("note")?)?;
        Some(NormalizedRecord::new(id, None, score))
    }
}

impl FormatNormalizer for JsonNormalizer {
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome {
        let SourceDocument::Json(value) = document else {
            return NormalizerUtils::mismatched(self.format(), document);
        };

        // A key holding anything other than an array counts as absent
        let Some(entries) = value.get(&self.array_key).and_then(|v| v.as_array()) else {
            debug!("json: array key '{}' not found", self.array_key);
            return NormalizeOutcome::Incomplete;
        };

        let records: Vec<NormalizedRecord> = entries.iter().filter_map(Self::read_entry).collect();
        debug!(
            "json: extracted {} records from {} entries",
            records.len(),
            entries.len()
        );
        NormalizeOutcome::Complete(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn name(&self) -> &str {
        "JSON Normalizer"
    }
}

impl Default for JsonNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
