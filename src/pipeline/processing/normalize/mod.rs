use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::domain::NormalizedRecord;
use crate::error::{ConsolidatorError, Result};

pub mod normalizers;
pub mod registry;

pub use normalizers::FormatNormalizer;
pub use registry::NormalizationRegistry;

/// The document formats a source can be published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Records carried as attributes of child elements
    AttributeXml,
    /// Records carried as nested child elements, identified by title
    ElementXml,
    Json,
    /// `id;note` lines
    Delimited,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::AttributeXml => constants::ATTRIBUTE_XML_FORMAT,
            SourceFormat::ElementXml => constants::ELEMENT_XML_FORMAT,
            SourceFormat::Json => constants::JSON_FORMAT,
            SourceFormat::Delimited => constants::DELIMITED_FORMAT,
        }
    }

    pub fn all() -> [SourceFormat; 4] {
        [
            SourceFormat::AttributeXml,
            SourceFormat::ElementXml,
            SourceFormat::Json,
            SourceFormat::Delimited,
        ]
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = ConsolidatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            constants::ATTRIBUTE_XML_FORMAT => Ok(SourceFormat::AttributeXml),
            constants::ELEMENT_XML_FORMAT => Ok(SourceFormat::ElementXml),
            constants::JSON_FORMAT => Ok(SourceFormat::Json),
            constants::DELIMITED_FORMAT => Ok(SourceFormat::Delimited),
            other => Err(ConsolidatorError::UnknownFormat(other.to_string())),
        }
    }
}

/// A source document after decoding, ready to hand to a format adapter
pub enum SourceDocument<'a> {
    Xml(roxmltree::Document<'a>),
    Json(serde_json::Value),
    Text(&'a str),
}

impl<'a> SourceDocument<'a> {
    /// Decode raw source text according to its format tag.
    ///
    /// Delimited text is kept as-is; emptiness is judged by the adapter, not here.
    pub fn decode(format: SourceFormat, raw: &'a str) -> Result<Self> {
        match format {
            SourceFormat::AttributeXml | SourceFormat::ElementXml => {
                Ok(SourceDocument::Xml(roxmltree::Document::parse(raw)?))
            }
            SourceFormat::Json => Ok(SourceDocument::Json(serde_json::from_str(raw)?)),
            SourceFormat::Delimited => Ok(SourceDocument::Text(raw)),
        }
    }

    /// Short label for log lines and mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            SourceDocument::Xml(_) => "xml",
            SourceDocument::Json(_) => "json",
            SourceDocument::Text(_) => "text",
        }
    }
}

/// The result of running one adapter over one document.
///
/// `Incomplete` means the anchor element or key was absent: not an error, but the
/// source is unusable. `Failed` carries a diagnostic message.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Complete(Vec<NormalizedRecord>),
    Incomplete,
    Failed(String),
}

impl NormalizeOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        NormalizeOutcome::Failed(message.into())
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        match self {
            NormalizeOutcome::Complete(records) => records,
            _ => &[],
        }
    }

    pub fn into_records(self) -> Vec<NormalizedRecord> {
        match self {
            NormalizeOutcome::Complete(records) => records,
            _ => Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, NormalizeOutcome::Complete(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            NormalizeOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}
