use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::constants::{
    OUTPUT_CONTRIBUTIONS_ELEMENT, OUTPUT_ENTRY_ELEMENT, OUTPUT_GENERATED_ATTRIBUTE,
    OUTPUT_ROOT_ELEMENT, OUTPUT_SOURCE_ELEMENT, OUTPUT_WRITE_FAILED_MESSAGE,
};
use crate::domain::ConsolidatedSet;
use crate::error::{ConsolidatorError, Result};
use crate::observability::metrics;

/// Result of a serialization attempt
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOutcome {
    pub success: bool,
    pub error: Option<String>,
    /// Where the document was written; `None` when no destination was configured
    pub written_to: Option<PathBuf>,
}

impl SerializeOutcome {
    fn written(path: &Path) -> Self {
        Self {
            success: true,
            error: None,
            written_to: Some(path.to_path_buf()),
        }
    }

    fn skipped() -> Self {
        Self {
            success: true,
            error: None,
            written_to: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            written_to: None,
        }
    }
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ConsolidatorError::XmlWrite(e.to_string()))
}

/// Render the consolidated set as a pretty-printed UTF-8 XML document.
///
/// Entries appear in the set's iteration order, contributions in their map's
/// iteration order. `generated_at` is stamped on the root as epoch seconds.
pub fn render_document(records: &ConsolidatedSet, generated_at: i64) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let generated = generated_at.to_string();
    let mut root = BytesStart::new(OUTPUT_ROOT_ELEMENT);
    root.push_attribute((OUTPUT_GENERATED_ATTRIBUTE, generated.as_str()));
    write_event(&mut writer, Event::Start(root))?;

    for record in records.values() {
        let id = record.id.to_string();
        let score = record.aggregate_score.to_string();
        let mut entry = BytesStart::new(OUTPUT_ENTRY_ELEMENT);
        entry.push_attribute(("id", id.as_str()));
        entry.push_attribute(("title", record.title.as_deref().unwrap_or("")));
        entry.push_attribute(("score", score.as_str()));
        write_event(&mut writer, Event::Start(entry))?;

        write_event(&mut writer, Event::Start(BytesStart::new(OUTPUT_CONTRIBUTIONS_ELEMENT)))?;
        for (source_id, source_score) in &record.contributions {
            let source_score = source_score.to_string();
            let mut source = BytesStart::new(OUTPUT_SOURCE_ELEMENT);
            source.push_attribute(("id", source_id.as_str()));
            source.push_attribute(("score", source_score.as_str()));
            write_event(&mut writer, Event::Empty(source))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new(OUTPUT_CONTRIBUTIONS_ELEMENT)))?;

        write_event(&mut writer, Event::End(BytesEnd::new(OUTPUT_ENTRY_ELEMENT)))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(OUTPUT_ROOT_ELEMENT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the consolidated set to `destination` in a single write call.
///
/// No destination is a no-op that reports success. A destination that cannot
/// be written reports failure with a fixed message; there is no retry.
pub fn serialize(records: &ConsolidatedSet, destination: Option<&Path>) -> SerializeOutcome {
    let Some(path) = destination else {
        debug!("No output destination configured; skipping serialization");
        return SerializeOutcome::skipped();
    };

    let bytes = match render_document(records, Utc::now().timestamp()) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to render consolidated document: {}", e);
            metrics::serialize::write_failed();
            return SerializeOutcome::failed(OUTPUT_WRITE_FAILED_MESSAGE);
        }
    };

    match fs::write(path, &bytes) {
        Ok(()) => {
            metrics::serialize::document_written(bytes.len());
            info!(
                "Wrote {} consolidated entries ({} bytes) to {}",
                records.len(),
                bytes.len(),
                path.display()
            );
            SerializeOutcome::written(path)
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            metrics::serialize::write_failed();
            SerializeOutcome::failed(OUTPUT_WRITE_FAILED_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConsolidatedRecord;
    use indexmap::IndexMap;

    fn sample_set() -> ConsolidatedSet {
        let mut contributions = IndexMap::new();
        contributions.insert("A".to_string(), 100.0);
        contributions.insert("B".to_string(), 0.0);
        contributions.insert("C".to_string(), 50.0);

        let mut set = ConsolidatedSet::new();
        set.insert(
            4,
            ConsolidatedRecord {
                id: 4,
                title: Some("Haibane & Renmei".to_string()),
                aggregate_score: 37.5,
                contributions,
            },
        );
        set.insert(
            9,
            ConsolidatedRecord {
                id: 9,
                title: None,
                aggregate_score: 3.0,
                contributions: IndexMap::from([("A".to_string(), 3.0)]),
            },
        );
        set
    }

    #[test]
    fn test_render_structure() {
        let bytes = render_document(&sample_set(), 1_700_000_000).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let doc = roxmltree::Document::parse(&text).unwrap();

        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "consolidation");
        assert_eq!(root.attribute("generated"), Some("1700000000"));

        let entries: Vec<_> = root.children().filter(|n| n.is_element()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].attribute("id"), Some("4"));
        assert_eq!(entries[0].attribute("title"), Some("Haibane & Renmei"));
        assert_eq!(entries[0].attribute("score"), Some("37.5"));
        assert_eq!(entries[0].attributes().count(), 3);
        assert_eq!(entries[1].attribute("title"), Some(""));

        let sources: Vec<(String, String)> = entries[0]
            .descendants()
            .filter(|n| n.has_tag_name("source"))
            .map(|n| {
                (
                    n.attribute("id").unwrap().to_string(),
                    n.attribute("score").unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            sources,
            vec![
                ("A".to_string(), "100".to_string()),
                ("B".to_string(), "0".to_string()),
                ("C".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_keeps_set_order() {
        let mut set = ConsolidatedSet::new();
        for id in [9, 2] {
            set.insert(
                id,
                ConsolidatedRecord {
                    id,
                    title: None,
                    aggregate_score: 1.0,
                    contributions: IndexMap::from([("Z".to_string(), 1.0), ("A".to_string(), 1.0)]),
                },
            );
        }

        let text = String::from_utf8(render_document(&set, 1).unwrap()).unwrap();
        let doc = roxmltree::Document::parse(&text).unwrap();
        let ids: Vec<&str> = doc
            .descendants()
            .filter(|n| n.has_tag_name("entry"))
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["9", "2"]);

        let first_sources: Vec<&str> = doc
            .descendants()
            .find(|n| n.has_tag_name("contributions"))
            .unwrap()
            .children()
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(first_sources, vec!["Z", "A"]);
    }

    #[test]
    fn test_render_is_pretty_printed_utf8() {
        let text = String::from_utf8(render_document(&sample_set(), 1).unwrap()).unwrap();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains("\n  <entry"));
    }

    #[test]
    fn test_empty_set_still_has_root() {
        let text = String::from_utf8(render_document(&ConsolidatedSet::new(), 42).unwrap()).unwrap();
        let doc = roxmltree::Document::parse(&text).unwrap();

        assert_eq!(doc.root_element().attribute("generated"), Some("42"));
        assert_eq!(doc.root_element().children().filter(|n| n.is_element()).count(), 0);
    }

    #[test]
    fn test_serialize_without_destination_is_noop() {
        let outcome = serialize(&sample_set(), None);
        assert!(outcome.success);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.written_to, None);
    }

    #[test]
    fn test_serialize_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");

        let outcome = serialize(&sample_set(), Some(&path));
        assert!(outcome.success);
        assert_eq!(outcome.written_to.as_deref(), Some(path.as_path()));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#"score="37.5""#));
    }

    #[test]
    fn test_serialize_reports_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xml");

        let outcome = serialize(&sample_set(), Some(&path));
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some(OUTPUT_WRITE_FAILED_MESSAGE));
        assert!(!path.exists());
    }
}
