use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

use crate::app::ports::{ConsolidationOutputPort, DocumentStorePort};
use crate::config::{AnchorSettings, GroupConfig, SourceConfig};
use crate::domain::{ConsolidatedSet, SourceBatch, SourceGroup, TitleLookup};
use crate::pipeline::processing::consolidation::{Consolidator, RunningAverageConsolidator};
use crate::pipeline::processing::normalize::{
    NormalizationRegistry, NormalizeOutcome, SourceDocument, SourceFormat,
};
use crate::pipeline::processing::serialize::SerializeOutcome;

/// What happened to one configured source during a run
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    /// Normalized completely; its records took part in consolidation
    Used { records: usize },
    /// The adapter's anchor was absent; the source was left out
    Incomplete,
    /// Reading, decoding or normalizing failed; the source was left out
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub group: String,
    pub source_id: String,
    pub format: SourceFormat,
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn is_used(&self) -> bool {
        matches!(self.status, SourceStatus::Used { .. })
    }
}

/// Summary of one full run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub consolidated: ConsolidatedSet,
    pub output: SerializeOutcome,
}

impl RunReport {
    pub fn sources_used(&self) -> usize {
        self.sources.iter().filter(|s| s.is_used()).count()
    }

    pub fn sources_skipped(&self) -> usize {
        self.sources.len() - self.sources_used()
    }

    pub fn records_consolidated(&self) -> usize {
        self.sources
            .iter()
            .map(|s| match s.status {
                SourceStatus::Used { records } => records,
                _ => 0,
            })
            .sum()
    }
}

/// Use case that reads, normalizes, consolidates and writes one run's sources
pub struct ConsolidationUseCase {
    registry: NormalizationRegistry,
    /// The consolidator implementation used to merge batches
    consolidator: Box<dyn Consolidator + Send + Sync>,
    documents: Arc<dyn DocumentStorePort>,
    /// Output port for writing the consolidated set
    output_port: Arc<dyn ConsolidationOutputPort>,
}

impl ConsolidationUseCase {
    /// Create a use case with the built-in adapters and running-average consolidator
    pub fn new(
        titles: Arc<TitleLookup>,
        anchors: &AnchorSettings,
        documents: Arc<dyn DocumentStorePort>,
        output_port: Arc<dyn ConsolidationOutputPort>,
    ) -> Self {
        Self {
            registry: NormalizationRegistry::with_anchors(anchors, titles.clone()),
            consolidator: Box::new(RunningAverageConsolidator::new(titles)),
            documents,
            output_port,
        }
    }

    /// Create a use case with a custom consolidator
    pub fn with_consolidator(
        registry: NormalizationRegistry,
        consolidator: Box<dyn Consolidator + Send + Sync>,
        documents: Arc<dyn DocumentStorePort>,
        output_port: Arc<dyn ConsolidationOutputPort>,
    ) -> Self {
        Self {
            registry,
            consolidator,
            documents,
            output_port,
        }
    }

    /// Decode raw text and run the adapter for its format
    pub fn normalize_text(&self, format: SourceFormat, raw: &str) -> NormalizeOutcome {
        match SourceDocument::decode(format, raw) {
            Ok(document) => self.registry.normalize(format, &document),
            Err(e) => NormalizeOutcome::failed(format!("failed to decode {} document: {}", format, e)),
        }
    }

    /// Read and normalize one configured source
    pub fn normalize_source(&self, source: &SourceConfig) -> NormalizeOutcome {
        match self.documents.read_document(&source.path) {
            Ok(raw) => self.normalize_text(source.format, &raw),
            Err(e) => NormalizeOutcome::failed(format!(
                "failed to read {}: {}",
                source.path.display(),
                e
            )),
        }
    }

    /// Run every configured group through normalization, consolidation and output.
    ///
    /// Sources that fail or come back incomplete are reported and left out; the
    /// remaining batches keep their configured order.
    pub fn run(&self, groups: &[GroupConfig]) -> RunReport {
        let start_time = std::time::Instant::now();
        let mut reports = Vec::new();
        let mut buckets = Vec::with_capacity(groups.len());

        for group in groups {
            let mut bucket = SourceGroup::new(group.name.clone());

            for source in &group.sources {
                let span = info_span!("source", group = %group.name, source = %source.id, format = %source.format);
                let _enter = span.enter();

                let status = match self.normalize_source(source) {
                    NormalizeOutcome::Complete(records) => {
                        debug!("Normalized {} records", records.len());
                        let status = SourceStatus::Used {
                            records: records.len(),
                        };
                        bucket.sources.push(SourceBatch::new(source.id.clone(), records));
                        status
                    }
                    NormalizeOutcome::Incomplete => {
                        warn!("Anchor not found in {}; source skipped", source.path.display());
                        SourceStatus::Incomplete
                    }
                    NormalizeOutcome::Failed(message) => {
                        warn!("Source skipped: {}", message);
                        SourceStatus::Failed(message)
                    }
                };

                reports.push(SourceReport {
                    group: group.name.clone(),
                    source_id: source.id.clone(),
                    format: source.format,
                    status,
                });
            }

            buckets.push(bucket);
        }

        let consolidated = self.consolidator.consolidate(&buckets);
        let output = self.output_port.write_consolidated(&consolidated);
        if let Some(message) = &output.error {
            error!("Output failed: {}", message);
        }

        let report = RunReport {
            sources: reports,
            consolidated,
            output,
        };
        info!(
            "Run completed: {}/{} sources used, {} records, {} entries in {:.2}ms",
            report.sources_used(),
            report.sources.len(),
            report.records_consolidated(),
            report.consolidated.len(),
            start_time.elapsed().as_secs_f64() * 1000.0
        );
        report
    }
}
