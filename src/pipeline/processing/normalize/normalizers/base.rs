use roxmltree::{Document, Node};

use crate::observability::metrics;
use crate::pipeline::processing::normalize::{NormalizeOutcome, SourceDocument, SourceFormat};

/// Base trait for format adapters.
///
/// Adapters are stateless: the same document always yields the same outcome.
pub trait FormatNormalizer: Send + Sync {
    /// Convert one decoded document into normalized records
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome;

    /// The format this adapter handles
    fn format(&self) -> SourceFormat;

    /// Get a human-readable name for this adapter
    fn name(&self) -> &str;
}

/// A wrapper that adds metrics to any adapter implementation
pub struct MetricsNormalizer<N: FormatNormalizer> {
    inner: N,
}

impl<N: FormatNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: FormatNormalizer> FormatNormalizer for MetricsNormalizer<N> {
    fn normalize(&self, document: &SourceDocument<'_>) -> NormalizeOutcome {
        let start_time = std::time::Instant::now();
        let outcome = self.inner.normalize(document);
        let format = self.inner.format().as_str();

        match &outcome {
            NormalizeOutcome::Complete(records) => {
                metrics::normalize::records_normalized(format, records.len());
            }
            NormalizeOutcome::Incomplete => metrics::normalize::source_incomplete(format),
            NormalizeOutcome::Failed(_) => metrics::normalize::source_failed(format),
        }
        metrics::normalize::duration(start_time.elapsed().as_secs_f64());

        outcome
    }

    fn format(&self) -> SourceFormat {
        self.inner.format()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Shared utilities for adapters
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// Find the anchor container element, which may be the root itself
    pub fn find_container<'a, 'input>(
        document: &'a Document<'input>,
        anchor: &str,
    ) -> Option<Node<'a, 'input>> {
        document.descendants().find(|n| n.is_element() && n.has_tag_name(anchor))
    }

    /// Element children of a node, skipping text, comments and processing instructions
    pub fn element_children<'a, 'input: 'a>(
        node: Node<'a, 'input>,
    ) -> impl Iterator<Item = Node<'a, 'input>> {
        node.children().filter(|n| n.is_element())
    }

    /// Trimmed text content of the first child element with the given tag
    pub fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
        node.children()
            .find(|c| c.is_element() && c.has_tag_name(tag))
            .and_then(|c| c.text())
            .map(str::trim)
    }

    /// Parse a plain integer field
    pub fn parse_int(raw: &str) -> Option<i64> {
        raw.trim().parse::<i64>().ok()
    }

    /// Parse an identity key. Anything that is not a plain integer is rejected.
    pub fn parse_id(raw: &str) -> Option<i64> {
        Self::parse_int(raw)
    }

    pub fn parse_year(raw: &str) -> Option<i32> {
        raw.trim().parse::<i32>().ok()
    }

    pub fn parse_score(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|s| s.is_finite())
    }

    /// Outcome for a document of the wrong kind handed to an adapter
    pub fn mismatched(expected: SourceFormat, document: &SourceDocument<'_>) -> NormalizeOutcome {
        NormalizeOutcome::failed(format!(
            "{} adapter cannot read a {} document",
            expected,
            document.kind()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_container_matches_root_and_nested() {
        let root = Document::parse("<scores><s/></scores>").unwrap();
        assert!(NormalizerUtils::find_container(&root, "scores").is_some());

        let nested = Document::parse("<feed><meta/><scores/></feed>").unwrap();
        assert!(NormalizerUtils::find_container(&nested, "scores").is_some());
        assert!(NormalizerUtils::find_container(&nested, "ratings").is_none());
    }

    #[test]
    fn test_parse_helpers_reject_non_numeric_text() {
        assert_eq!(NormalizerUtils::parse_id(" 42 "), Some(42));
        assert_eq!(NormalizerUtils::parse_id("abc"), None);
        assert_eq!(NormalizerUtils::parse_id("4.5"), None);
        assert_eq!(NormalizerUtils::parse_score("7.5"), Some(7.5));
        assert_eq!(NormalizerUtils::parse_score("NaN"), None);
        assert_eq!(NormalizerUtils::parse_year("1998"), Some(1998));
        assert_eq!(NormalizerUtils::parse_int("-3"), Some(-3));
        assert_eq!(NormalizerUtils::parse_int("8.5"), None);
    }

    #[test]
    fn test_child_text_is_trimmed() {
        let doc = Document::parse("<item><name>  Kino  </name></item>").unwrap();
        let item = doc.root_element();
        assert_eq!(NormalizerUtils::child_text(item, "name"), Some("Kino"));
        assert_eq!(NormalizerUtils::child_text(item, "note"), None);
    }
}
