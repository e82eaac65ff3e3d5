use std::collections::{BTreeMap, HashMap};

use crate::error::{ConsolidatorError, Result};

/// Read-only bidirectional mapping between numeric ids and display titles.
///
/// Built once per run and shared behind an `Arc` by the element-XML adapter and
/// the consolidator. Nothing mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct TitleLookup {
    by_id: BTreeMap<i64, String>,
    by_title: HashMap<String, i64>,
}

impl TitleLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lookup from `(id, title)` pairs. Repeating an id or a title is
    /// rejected so the inverse mapping stays unambiguous.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut lookup = Self::new();
        for (id, title) in pairs {
            let title = title.into();
            if lookup.by_id.contains_key(&id) {
                return Err(ConsolidatorError::Config(format!(
                    "title id {} is defined more than once",
                    id
                )));
            }
            if let Some(existing) = lookup.by_title.get(&title) {
                return Err(ConsolidatorError::Config(format!(
                    "title '{}' is mapped to both {} and {}",
                    title, existing, id
                )));
            }
            lookup.by_title.insert(title.clone(), id);
            lookup.by_id.insert(id, title);
        }
        Ok(lookup)
    }

    /// Build a lookup from the string-keyed table found in config files
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self> {
        let pairs = table
            .iter()
            .map(|(key, title)| {
                key.trim()
                    .parse::<i64>()
                    .map(|id| (id, title.clone()))
                    .map_err(|_| {
                        ConsolidatorError::Config(format!("title key '{}' is not an integer id", key))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_pairs(pairs)
    }

    pub fn title(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(|t| t.as_str())
    }

    /// Inverse lookup: title to id. Matching is exact.
    pub fn id_for(&self, title: &str) -> Option<i64> {
        self.by_title.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
