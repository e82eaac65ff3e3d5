use std::sync::Arc;
use tracing::debug;

use super::base::{FormatNormalizer, NormalizerUtils};
use crate::constants;
use crate::domain::{NormalizedRecord, TitleLookup};
use crate::pipeline::processing::normalize::{NormalizeOutcome, SourceDocument, SourceFormat};

/// Adapter for feeds that identify each rating by title rather than id:
///
/// ```xml
/// <scores>
///   <anime><name>Planetes</name><year>2003</year><note>9</note></anime>
/// </scores>
/// ```
///
/// Titles are resolved to ids through the shared title lookup.
pub struct ElementXmlNormalizer {
    container: String,
    titles: Arc<TitleLookup>,
}

impl ElementXmlNormalizer {
    pub fn new(titles: Arc<TitleLookup>) -> Self {
        Self::with_container(constants::DEFAULT_ELEMENT_XML_ANCHOR, titles)
    }

    pub fn with_container(container: impl Into<String>, titles: Arc<TitleLookup>) -> Self {
        Self {
            container: container.into(),
            titles,
        }
    }

    fn read_element(&self, node: roxmltree::Node<'_, '_>) -> Option<NormalizedRecord> {
        let name = NormalizerUtils::child_text(node, "name")?;
        let id = self.titles.id_for(name)?;
        let score = NormalizerUtils::parse_score(NormalizerUtils::child_text(node, "note")?)?;
        // year is optional, but a year that is present must be readable
        let year = match NormalizerUtils::child_text(node, "year") {
            Some(raw) => Some(NormalizerUtils::parse_year(raw)?),
            None => None,
        };
        Some(NormalizedRecord::new(id, year, score))
    }
}

impl FormatNormalizer for ElementXmlNormalizer {
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome {
        let SourceDocument::Xml(doc) = document else {
            return NormalizerUtils::mismatched(self.format(), document);
        };

        let Some(container) = NormalizerUtils::find_container(doc, &self.container) else {
            debug!("element_xml: container <{}> not found", self.container);
            return NormalizeOutcome::Incomplete;
        };

        let mut records = Vec::new();
        for element in NormalizerUtils::element_children(container) {
            match self.read_element(element) {
                Some(record) => records.push(record),
                None => debug!(
                    "element_xml: skipping <{}> with unknown title or missing fields",
                    element.tag_name().name()
                ),
            }
        }

        NormalizeOutcome::Complete(records)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::ElementXml
    }

    fn name(&self) -> &str {
        "Element XML Normalizer"
    }
}
