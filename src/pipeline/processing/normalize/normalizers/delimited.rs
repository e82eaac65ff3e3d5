use tracing::debug;

use super::base::{FormatNormalizer, NormalizerUtils};
use crate::constants::{DELIMITED_FIELD_SEPARATOR, EMPTY_DELIMITED_INPUT_MESSAGE};
use crate::domain::NormalizedRecord;
use crate::pipeline::processing::normalize::{NormalizeOutcome, SourceDocument, SourceFormat};

/// Adapter for plain-text feeds with one `id;note` pair per line.
///
/// Lines that do not split into exactly two numeric fields are skipped.
/// An input with no lines at all is a failure.
pub struct DelimitedNormalizer;

impl DelimitedNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn read_line(line: &str) -> Option<NormalizedRecord> {
        let fields: Vec<&str> = line.split(DELIMITED_FIELD_SEPARATOR).collect();
        let [id, note] = fields.as_slice() else {
            return None;
        };
        let id = NormalizerUtils::parse_id(id)?;
        let score = NormalizerUtils::parse_score(note)?;
        Some(NormalizedRecord::new(id, None, score))
    }
}

impl FormatNormalizer for DelimitedNormalizer {
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome {
        let SourceDocument::Text(text) = document else {
            return NormalizerUtils::mismatched(self.format(), document);
        };

        if text.lines().next().is_none() {
            return NormalizeOutcome::failed(EMPTY_DELIMITED_INPUT_MESSAGE);
        }

        let mut records = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            match Self::read_line(line) {
                Some(record) => records.push(record),
                None => debug!("delimited: skipping line {}", line_no + 1),
            }
        }

        NormalizeOutcome::Complete(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Delimited
    }

    fn name(&self) -> &str {
        "Delimited Text Normalizer"
    }
}

impl Default for DelimitedNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
