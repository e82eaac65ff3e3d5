use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{ConsolidatedRecord, ConsolidatedSet, NormalizedRecord, SourceGroup, TitleLookup};
use crate::observability::metrics;

/// Trait for merging grouped source batches into one record per identity
pub trait Consolidator {
    /// Consume every group, source and record in the supplied order and return
    /// the merged set. Nothing is visible until the whole input is consumed.
    fn consolidate(&self, groups: &[SourceGroup]) -> ConsolidatedSet;
}

/// Consolidator that folds scores with a running pairwise average.
///
/// Each new score for a known id is averaged with the current aggregate, so
/// later sources weigh more than earlier ones: 10, 20, 30 yields 22.5, not 20.
/// Every aggregate already published depends on this, so it must not be
/// replaced with a true mean without a product decision.
pub struct RunningAverageConsolidator {
    titles: Arc<TitleLookup>,
}

impl RunningAverageConsolidator {
    pub fn new(titles: Arc<TitleLookup>) -> Self {
        Self { titles }
    }

    /// Fold one record from `source_id` into the output set
    fn absorb(&self, output: &mut ConsolidatedSet, source_id: &str, record: &NormalizedRecord) {
        match output.entry(record.id) {
            Entry::Vacant(slot) => {
                let mut contributions = IndexMap::new();
                contributions.insert(source_id.to_string(), record.score);
                slot.insert(ConsolidatedRecord {
                    id: record.id,
                    title: self.titles.title(record.id).map(str::to_string),
                    aggregate_score: record.score,
                    contributions,
                });
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                // Halve before adding so two large finite scores cannot overflow
                existing.aggregate_score = existing.aggregate_score / 2.0 + record.score / 2.0;
                // Same source reporting the id again replaces its earlier score in place
                existing
                    .contributions
                    .insert(source_id.to_string(), record.score);
            }
        }
    }
}

impl Consolidator for RunningAverageConsolidator {
    fn consolidate(&self, groups: &[SourceGroup]) -> ConsolidatedSet {
        let start_time = std::time::Instant::now();
        let mut output = ConsolidatedSet::new();
        let mut records_seen = 0usize;

        for group in groups {
            debug!(
                "Consolidating group '{}' with {} sources ({} records)",
                group.name,
                group.sources.len(),
                group.record_count()
            );
            for batch in &group.sources {
                for record in &batch.records {
                    self.absorb(&mut output, &batch.source_id, record);
                }
                records_seen += batch.records.len();
            }
        }

        let untitled = output.values().filter(|r| r.title.is_none()).count();
        metrics::consolidate::pass_completed(records_seen, output.len(), untitled);
        metrics::consolidate::duration(start_time.elapsed().as_secs_f64());
        info!(
            "Consolidated {} records into {} entries ({} without title) in {:.2}ms",
            records_seen,
            output.len(),
            untitled,
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceBatch;

    fn consolidator() -> RunningAverageConsolidator {
        let titles = TitleLookup::from_pairs(vec![(4, "Serial Experiments Lain")]).unwrap();
        RunningAverageConsolidator::new(Arc::new(titles))
    }

    fn record(id: i64, score: f64) -> NormalizedRecord {
        NormalizedRecord::new(id, None, score)
    }

    #[test]
    fn test_one_entry_per_distinct_id() {
        let groups = vec![
            SourceGroup::new("first")
                .with_source(SourceBatch::new("A", vec![record(1, 5.0), record(2, 6.0)])),
            SourceGroup::new("second")
                .with_source(SourceBatch::new("B", vec![record(2, 8.0), record(3, 9.0)])),
        ];

        let output = consolidator().consolidate(&groups);
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_running_pairwise_average_not_mean() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(9, 10.0)]))
            .with_source(SourceBatch::new("B", vec![record(9, 20.0)]))
            .with_source(SourceBatch::new("C", vec![record(9, 30.0)]))];

        let output = consolidator().consolidate(&groups);
        assert_eq!(output[&9].aggregate_score, 22.5);
    }

    #[test]
    fn test_order_changes_aggregate() {
        let forward = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(1, 0.0)]))
            .with_source(SourceBatch::new("B", vec![record(1, 8.0)]))
            .with_source(SourceBatch::new("C", vec![record(1, 4.0)]))];
        let reversed = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("C", vec![record(1, 4.0)]))
            .with_source(SourceBatch::new("B", vec![record(1, 8.0)]))
            .with_source(SourceBatch::new("A", vec![record(1, 0.0)]))];

        assert_eq!(consolidator().consolidate(&forward)[&1].aggregate_score, 4.0);
        assert_eq!(consolidator().consolidate(&reversed)[&1].aggregate_score, 3.0);
    }

    #[test]
    fn test_same_source_contribution_is_overwritten() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(5, 40.0), record(5, 60.0)]))];

        let output = consolidator().consolidate(&groups);
        let entry = &output[&5];
        assert_eq!(entry.contributions.len(), 1);
        assert_eq!(entry.contributions["A"], 60.0);
        assert_eq!(entry.aggregate_score, 50.0);
    }

    #[test]
    fn test_same_source_id_across_groups_collapses() {
        let groups = vec![
            SourceGroup::new("g1").with_source(SourceBatch::new("A", vec![record(5, 1.0)])),
            SourceGroup::new("g2").with_source(SourceBatch::new("A", vec![record(5, 3.0)])),
        ];

        let entry = &consolidator().consolidate(&groups)[&5];
        assert_eq!(entry.contributions.len(), 1);
        assert_eq!(entry.contributions["A"], 3.0);
    }

    #[test]
    fn test_title_resolution() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(4, 1.0), record(8, 2.0)]))];

        let output = consolidator().consolidate(&groups);
        assert_eq!(output[&4].title.as_deref(), Some("Serial Experiments Lain"));
        assert_eq!(output[&8].title, None);
        assert_eq!(output[&8].aggregate_score, 2.0);
    }

    #[test]
    fn test_three_sources_end_to_end_scores() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(4, 100.0)]))
            .with_source(SourceBatch::new("B", vec![record(4, 0.0)]))
            .with_source(SourceBatch::new("C", vec![record(4, 50.0)]))];

        let entry = &consolidator().consolidate(&groups)[&4];
        // ((100 + 0) / 2 + 50) / 2
        assert_eq!(entry.aggregate_score, 50.0);
        let contributions: Vec<(&str, f64)> =
            entry.contributions.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(contributions, vec![("A", 100.0), ("B", 0.0), ("C", 50.0)]);
    }

    #[test]
    fn test_three_sources_reordered_scores() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(4, 100.0)]))
            .with_source(SourceBatch::new("C", vec![record(4, 50.0)]))
            .with_source(SourceBatch::new("B", vec![record(4, 0.0)]))];

        let entry = &consolidator().consolidate(&groups)[&4];
        // ((100 + 50) / 2 + 0) / 2
        assert_eq!(entry.aggregate_score, 37.5);
        assert_eq!(entry.contributions.len(), 3);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("Z", vec![record(9, 1.0), record(2, 2.0)]))
            .with_source(SourceBatch::new("A", vec![record(9, 3.0)]))
            .with_source(SourceBatch::new("Z", vec![record(9, 5.0)]))];

        let output = consolidator().consolidate(&groups);
        assert_eq!(output.keys().copied().collect::<Vec<_>>(), vec![9, 2]);

        let sources: Vec<(&str, f64)> = output[&9]
            .contributions
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(sources, vec![("Z", 5.0), ("A", 3.0)]);
    }

    #[test]
    fn test_large_scores_stay_finite() {
        let groups = vec![SourceGroup::new("g")
            .with_source(SourceBatch::new("A", vec![record(1, 1e308)]))
            .with_source(SourceBatch::new("B", vec![record(1, 1e308)]))];

        let entry = &consolidator().consolidate(&groups)[&1];
        assert!(entry.aggregate_score.is_finite());
        assert_eq!(entry.aggregate_score, 1e308);
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(consolidator().consolidate(&[]).is_empty());
        assert!(consolidator()
            .consolidate(&[SourceGroup::new("empty")])
            .is_empty());
    }
}
