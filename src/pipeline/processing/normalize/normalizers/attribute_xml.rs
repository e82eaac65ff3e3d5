use tracing::debug;

use super::base::{FormatNormalizer, NormalizerUtils};
use crate::constants;
use crate::domain::NormalizedRecord;
use crate::pipeline::processing::normalize::{NormalizeOutcome, SourceDocument, SourceFormat};

/// Adapter for feeds that carry each rating as attributes of a child element:
///
/// ```xml
/// <scores>
///   <anime ep="12" year="2003" note="8"/>
/// </scores>
/// ```
pub struct AttributeXmlNormalizer {
    container: String,
}

impl AttributeXmlNormalizer {
    pub fn new() -> Self {
        Self::with_container(constants::DEFAULT_ATTRIBUTE_XML_ANCHOR)
    }

    pub fn with_container(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    fn read_element(node: roxmltree::Node<'_, '_>) -> Option<NormalizedRecord> {
        let id = NormalizerUtils::parse_id(node.attribute("ep")?)?;
        let year = NormalizerUtils::parse_year(node.attribute("year")?)?;
        let note = NormalizerUtils::parse_int(node.attribute("note")?)?;
        Some(NormalizedRecord::new(id, Some(year), note as f64))
    }
}

impl FormatNormalizer for AttributeXmlNormalizer {
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome {
        let SourceDocument::Xml(doc) = document else {
            return NormalizerUtils::mismatched(self.format(), document);
        };

        let Some(container) = NormalizerUtils::find_container(doc, &self.container) else {
            debug!("attribute_xml: container <{}> not found", self.container);
            return NormalizeOutcome::Incomplete;
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for element in NormalizerUtils::element_children(container) {
            match Self::read_element(element) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        debug!(
            "attribute_xml: extracted {} records, skipped {} elements",
            records.len(),
            skipped
        );
        NormalizeOutcome::Complete(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::AttributeXml
    }

    fn name(&self) -> &str {
        "Attribute XML Normalizer"
    }
}

impl Default for AttributeXmlNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
