use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::domain::TitleLookup;
use crate::error::{ConsolidatorError, Result};
use crate::pipeline::processing::normalize::SourceFormat;

/// Run configuration, loaded from a TOML file:
///
/// ```toml
/// output = "output/consolidated.xml"
///
/// [titles]
/// 4 = "Serial Experiments Lain"
///
/// [[groups]]
/// name = "primary"
///
/// [[groups.sources]]
/// id = "A"
/// format = "attribute_xml"
/// path = "feeds/a.xml"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where the consolidated document is written; absent means no output
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Title table keyed by integer id (TOML keys are strings)
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    #[serde(default)]
    pub anchors: AnchorSettings,
    /// Groups in traversal order
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Container element or array key each adapter looks for
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnchorSettings {
    pub attribute_xml: String,
    pub element_xml: String,
    pub json: String,
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            attribute_xml: constants::DEFAULT_ATTRIBUTE_XML_ANCHOR.to_string(),
            element_xml: constants::DEFAULT_ELEMENT_XML_ANCHOR.to_string(),
            json: constants::DEFAULT_JSON_ANCHOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    /// Sources in traversal order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier recorded in each consolidated entry's contributions
    pub id: String,
    pub format: SourceFormat,
    pub path: PathBuf,
}

impl Config {
    /// Resolve the config path: `RATING_CONSOLIDATOR_CONFIG` if set, else the default file
    pub fn locate() -> PathBuf {
        std::env::var(constants::CONFIG_PATH_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_CONFIG_PATH))
    }

    /// Load and validate a config file. Relative source and output paths are
    /// resolved against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConsolidatorError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate config text without touching the filesystem
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for group in &self.groups {
            let mut seen = HashSet::new();
            for source in &group.sources {
                if source.id.trim().is_empty() {
                    return Err(ConsolidatorError::Config(format!(
                        "group '{}' has a source with an empty id",
                        group.name
                    )));
                }
                if !seen.insert(source.id.as_str()) {
                    return Err(ConsolidatorError::Config(format!(
                        "source id '{}' appears twice in group '{}'",
                        source.id, group.name
                    )));
                }
            }
        }

        // Surfaces bad keys and duplicate titles at load time
        self.title_lookup()?;
        Ok(())
    }

    /// Build the shared title lookup from the `[titles]` table
    pub fn title_lookup(&self) -> Result<TitleLookup> {
        TitleLookup::from_table(&self.titles)
    }

    pub fn source_count(&self) -> usize {
        self.groups.iter().map(|g| g.sources.len()).sum()
    }

    fn resolve_paths(&mut self, base: &Path) {
        for source in self.groups.iter_mut().flat_map(|g| g.sources.iter_mut()) {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        if let Some(output) = self.output.as_mut() {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
output = "out/consolidated.xml"

[titles]
4 = "Serial Experiments Lain"
7 = "Mushishi"

[anchors]
json = "items"

[[groups]]
name = "primary"

[[groups.sources]]
id = "A"
format = "attribute_xml"
path = "feeds/a.xml"

[[groups.sources]]
id = "B"
format = "delimited"
path = "/srv/feeds/b.txt"

[[groups]]
name = "secondary"

[[groups.sources]]
id = "C"
format = "json"
path = "feeds/c.json"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.output, Some(PathBuf::from("out/consolidated.xml")));
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.source_count(), 3);
        assert_eq!(config.groups[0].sources[1].format, SourceFormat::Delimited);
        assert_eq!(config.anchors.json, "items");
        assert_eq!(config.anchors.attribute_xml, constants::DEFAULT_ATTRIBUTE_XML_ANCHOR);
        assert_eq!(config.title_lookup().unwrap().title(7), Some("Mushishi"));
    }

    #[test]
    fn test_empty_config_has_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.output, None);
        assert!(config.groups.is_empty());
        assert_eq!(config.anchors, AnchorSettings::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let content = r#"
[[groups]]
name = "g"
[[groups.sources]]
id = "A"
format = "yaml"
path = "a.yaml"
"#;
        assert!(Config::from_toml_str(content).is_err());
    }

    #[test]
    fn test_duplicate_source_in_group_is_rejected() {
        let content = r#"
[[groups]]
name = "g"
[[groups.sources]]
id = "A"
format = "json"
path = "a.json"
[[groups.sources]]
id = "A"
format = "delimited"
path = "a.txt"
"#;
        assert!(Config::from_toml_str(content).is_err());
    }

    #[test]
    fn test_non_integer_title_key_is_rejected() {
        assert!(Config::from_toml_str("[titles]\nlain = \"Serial Experiments Lain\"\n").is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consolidator.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.groups[0].sources[0].path, dir.path().join("feeds/a.xml"));
        assert_eq!(config.groups[0].sources[1].path, PathBuf::from("/srv/feeds/b.txt"));
        assert_eq!(config.output, Some(dir.path().join("out/consolidated.xml")));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConsolidatorError::Config(_)));
    }
}
