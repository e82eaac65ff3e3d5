/// Format tag constants used in configuration files and on the command line.
/// These must stay in sync with `SourceFormat::as_str`.
pub const ATTRIBUTE_XML_FORMAT: &str = "attribute_xml";
pub const ELEMENT_XML_FORMAT: &str = "element_xml";
pub const JSON_FORMAT: &str = "json";
pub const DELIMITED_FORMAT: &str = "delimited";

// Default anchors: the container element (XML) or array key (JSON) holding the records
pub const DEFAULT_ATTRIBUTE_XML_ANCHOR: &str = "scores";
pub const DEFAULT_ELEMENT_XML_ANCHOR: &str = "scores";
pub const DEFAULT_JSON_ANCHOR: &str = "scores";

/// Field separator for delimited-text sources
pub const DELIMITED_FIELD_SEPARATOR: char = ';';

// Fixed diagnostics reported through outcome values
pub const EMPTY_DELIMITED_INPUT_MESSAGE: &str = "delimited source is empty";
pub const OUTPUT_WRITE_FAILED_MESSAGE: &str = "unable to write consolidated output document";

// Output document vocabulary
pub const OUTPUT_ROOT_ELEMENT: &str = "consolidation";
pub const OUTPUT_GENERATED_ATTRIBUTE: &str = "generated";
pub const OUTPUT_ENTRY_ELEMENT: &str = "entry";
pub const OUTPUT_CONTRIBUTIONS_ELEMENT: &str = "contributions";
pub const OUTPUT_SOURCE_ELEMENT: &str = "source";

/// Config file used when no path is given and the env var is unset
pub const DEFAULT_CONFIG_PATH: &str = "consolidator.toml";
pub const CONFIG_PATH_ENV_VAR: &str = "RATING_CONSOLIDATOR_CONFIG";

/// Get all supported format tags
pub fn get_supported_formats() -> Vec<&'static str> {
    vec![
        ATTRIBUTE_XML_FORMAT,
        ELEMENT_XML_FORMAT,
        JSON_FORMAT,
        DELIMITED_FORMAT,
    ]
}
