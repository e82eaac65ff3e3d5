use std::collections::HashMap;
use std::sync::Arc;

use super::normalizers::{
    AttributeXmlNormalizer, DelimitedNormalizer, ElementXmlNormalizer, FormatNormalizer,
    JsonNormalizer, MetricsNormalizer,
};
use super::{NormalizeOutcome, SourceDocument, SourceFormat};
use crate::config::AnchorSettings;
use crate::domain::TitleLookup;

/// Registry of format adapters, selected by the source's format tag
pub struct NormalizationRegistry {
    normalizers: HashMap<SourceFormat, Box<dyn FormatNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a registry with every built-in adapter using the default anchors
    pub fn new(titles: Arc<TitleLookup>) -> Self {
        Self::with_anchors(&AnchorSettings::default(), titles)
    }

    /// Create a registry with every built-in adapter using configured anchors
    pub fn with_anchors(anchors: &AnchorSettings, titles: Arc<TitleLookup>) -> Self {
        let mut registry = Self {
            normalizers: HashMap::new(),
        };

        registry.register(Box::new(MetricsNormalizer::new(
            AttributeXmlNormalizer::with_container(anchors.attribute_xml.clone()),
        )));
        registry.register(Box::new(MetricsNormalizer::new(
            ElementXmlNormalizer::with_container(anchors.element_xml.clone(), titles),
        )));
        registry.register(Box::new(MetricsNormalizer::new(JsonNormalizer::with_array_key(
            anchors.json.clone(),
        ))));
        registry.register(Box::new(MetricsNormalizer::new(DelimitedNormalizer::new())));

        registry
    }

    /// Register an adapter, replacing any adapter already handling its format
    pub fn register(&mut self, normalizer: Box<dyn FormatNormalizer>) {
        self.normalizers.insert(normalizer.format(), normalizer);
    }

    /// Get the adapter for a format
    pub fn get_normalizer(&self, format: SourceFormat) -> Option<&dyn FormatNormalizer> {
        self.normalizers.get(&format).map(|n| n.as_ref())
    }

    /// Normalize a decoded document with the adapter registered for its format
    pub fn normalize(&self, format: SourceFormat, document: &SourceDocument<'_>) -> NormalizeOutcome {
        match self.get_normalizer(format) {
            Some(normalizer) => normalizer.normalize(document),
            None => NormalizeOutcome::failed(format!("no normalizer registered for format: {}", format)),
        }
    }

    /// List all registered formats in a stable order
    pub fn list_formats(&self) -> Vec<SourceFormat> {
        let mut formats: Vec<SourceFormat> = self.normalizers.keys().copied().collect();
        formats.sort();
        formats
    }
}
