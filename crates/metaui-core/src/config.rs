//! Runtime configuration for the metaui widget layer.
//!
//! A [`Config`] is handed to every page explicitly; nothing in the widget
//! layer reads configuration from global state.

use serde::Deserialize;

/// Configuration for building and prefilling widget pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page size used by data widgets that do not configure one.
    pub default_page_size: usize,
    /// Maximum number of relation hops tried when a widget's object differs
    /// from the object of a data sheet.
    pub relation_path_depth: usize,
    /// Delimiter for list aggregations and multi-value filter prefills.
    pub list_delimiter: String,
    /// Fall back to the bound attribute's name when a widget has no caption.
    pub auto_caption: bool,
    /// Default `tracing` filter directive for [`crate::logging::init_with_filter`].
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_page_size: 20,
            relation_path_depth: 3,
            list_delimiter: ",".to_string(),
            auto_caption: true,
            log_filter: crate::logging::DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilingMode {
    /// Profiling scopes are disabled
    #[default]
    Off,
    /// Profiling scopes are collected (requires the `profiling` feature)
    On,
}
