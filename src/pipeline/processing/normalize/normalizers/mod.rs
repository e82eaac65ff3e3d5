// Base trait and utilities for format adapters
pub mod base;

// One adapter per supported source format
pub mod attribute_xml;
pub mod element_xml;
pub mod json;
pub mod delimited;

// Re-export the main components
pub use base::{FormatNormalizer, MetricsNormalizer, NormalizerUtils};
pub use attribute_xml::AttributeXmlNormalizer;
pub use element_xml::ElementXmlNormalizer;
pub use json::JsonNormalizer;
pub use delimited::DelimitedNormalizer;
