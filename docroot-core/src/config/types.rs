//! Configuration type definitions
//!
//! These types represent the runtime configuration for docroot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for docroot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocrootConfig {
    /// Debug mode
    #[serde(default)]
    pub debug: bool,

    /// Static file handling
    #[serde(default)]
    pub files: FilesConfig,

    /// Global logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Static file handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Root directory that relative request paths resolve against
    #[serde(default = "default_root")]
    pub root: String,

    /// Index files to look for, in preference order
    #[serde(default = "default_index")]
    pub index: Vec<String>,

    /// Render a directory listing when no index file exists
    #[serde(default = "default_bool_true")]
    pub autoindex: bool,

    /// Walk the extension chain until a known MIME type is found
    #[serde(default = "default_bool_true")]
    pub negotiate: bool,

    /// Type reported for unknown extensions
    #[serde(default = "default_type")]
    pub default_type: String,

    /// Extra extension -> MIME type mappings (".md" = "text/markdown")
    #[serde(default)]
    pub mime_types: HashMap<String, String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index: default_index(),
            autoindex: true,
            negotiate: true,
            default_type: default_type(),
            mime_types: HashMap::new(),
        }
    }
}

fn default_root() -> String {
    ".".to_string()
}

fn default_index() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_bool_true() -> bool {
    true
}

fn default_type() -> String {
    "application/octet-stream".to_string()
}

/// Global logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocrootConfig::default();
        assert!(!config.debug);
        assert!(config.files.autoindex);
        assert_eq!(config.files.index, vec!["index.html", "index.htm"]);
        assert_eq!(config.files.default_type, "application/octet-stream");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_json_deserialize() {
        let json = r#"{
            "debug": true,
            "files": { "autoindex": false }
        }"#;
        let config: DocrootConfig = serde_json::from_str(json).unwrap();
        assert!(config.debug);
        assert!(!config.files.autoindex);
        // Omitted fields keep their defaults
        assert!(config.files.negotiate);
        assert_eq!(config.files.root, ".");
    }

    #[test]
    fn test_log_format() {
        let json = r#"{ "level": "debug", "format": "json" }"#;
        let logging: LoggingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
    }
}
