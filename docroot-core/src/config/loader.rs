//! Configuration loader

use crate::config::DocrootConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DocrootConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!("Loading {} configuration from {}", ext, path.display());

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: {}", ext))),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<DocrootConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<DocrootConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_loading() {
        let json = r#"{"files": {"index": ["default.htm"]}}"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.files.index, vec!["default.htm"]);
    }

    #[test]
    fn test_toml_loading() {
        let toml = r#"
            [files]
            root = "/srv/www"
            negotiate = false

            [files.mime_types]
            ".en" = "text/plain"

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.files.root, "/srv/www");
        assert!(!config.files.negotiate);
        assert_eq!(config.files.mime_types.get(".en").map(String::as_str), Some("text/plain"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docroot.toml");
        std::fs::write(&path, "debug = true\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert!(config.debug);
    }

    #[test]
    fn test_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docroot.ini");
        std::fs::write(&path, "debug = true\n").unwrap();

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(dir.path().join("absent.toml")).unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(ConfigLoader::from_json("{ not json").is_err());
    }
}
