use indexmap::IndexMap;
use serde::Serialize;

pub mod titles;

pub use titles::TitleLookup;

/// A single rating extracted from one source document, in the shape every
/// format adapter produces
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Cross-source identity key
    pub id: i64,
    /// Release year, when the source carries one
    pub year: Option<i32>,
    pub score: f64,
}

impl NormalizedRecord {
    pub fn new(id: i64, year: Option<i32>, score: f64) -> Self {
        Self { id, year, score }
    }
}

/// The merged view of one identity across every source that reported it
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedRecord {
    pub id: i64,
    /// Display title, when the id is known to the title lookup
    pub title: Option<String>,
    /// Running pairwise average of every score seen for this id
    pub aggregate_score: f64,
    /// Last score seen per source identifier, in first-seen source order
    pub contributions: IndexMap<String, f64>,
}

/// Consolidated records keyed by id, in the order each id was first seen
pub type ConsolidatedSet = IndexMap<i64, ConsolidatedRecord>;

/// The records contributed by one source, tagged with its stable identifier
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub source_id: String,
    pub records: Vec<NormalizedRecord>,
}

impl SourceBatch {
    pub fn new(source_id: impl Into<String>, records: Vec<NormalizedRecord>) -> Self {
        Self {
            source_id: source_id.into(),
            records,
        }
    }
}

/// A logical bucket of sources. Groups only affect traversal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceGroup {
    pub name: String,
    pub sources: Vec<SourceBatch>,
}

impl SourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, batch: SourceBatch) -> Self {
        self.sources.push(batch);
        self
    }

    /// Total number of records across every source in this group
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(|s| s.records.len()).sum()
    }
}
