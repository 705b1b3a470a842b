//! MIME type handling

use docroot_core::config::FilesConfig;
use std::collections::HashMap;

/// Type returned for extensions nobody recognises
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Maps a dotted extension (".html") to a MIME type.
///
/// Unknown extensions must resolve to [`MimeRegistry::fallback`]. Extension
/// negotiation keeps searching while [`MimeRegistry::is_known`] is false,
/// so registries whose fallback is also a real type override it.
pub trait MimeRegistry: Send + Sync {
    /// Look up the type for `extension`
    fn lookup(&self, extension: &str) -> &str;

    /// The "unrecognized" sentinel
    fn fallback(&self) -> &str {
        DEFAULT_MIME
    }

    /// Whether `extension` resolves to a concrete type.
    ///
    /// The default compares against the fallback.
    fn is_known(&self, extension: &str) -> bool {
        self.lookup(extension) != self.fallback()
    }
}

/// Registry backed by explicit overrides and the `mime_guess` database
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
    guess: bool,
    fallback: String,
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeTable {
    /// Registry that knows everything `mime_guess` knows
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            guess: true,
            fallback: DEFAULT_MIME.to_string(),
        }
    }

    /// Registry that only knows explicitly inserted types
    pub fn empty() -> Self {
        Self {
            guess: false,
            ..Self::new()
        }
    }

    /// Build from the `[files]` configuration section
    pub fn from_config(config: &FilesConfig) -> Self {
        let mut table = Self::new().with_fallback(config.default_type.clone());
        for (ext, mime) in &config.mime_types {
            table.insert(ext, mime);
        }
        table
    }

    /// Replace the fallback type
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Add or replace a mapping. A missing leading dot is added.
    pub fn insert(&mut self, extension: &str, mime: &str) {
        self.types.insert(normalize(extension), mime.to_string());
    }

    /// Builder form of [`MimeTable::insert`]
    pub fn with(mut self, extension: &str, mime: &str) -> Self {
        self.insert(extension, mime);
        self
    }

    /// Override or `mime_guess` hit, without the fallback
    fn resolve(&self, extension: &str) -> Option<&str> {
        if let Some(mime) = self.types.get(&extension.to_ascii_lowercase()) {
            return Some(mime.as_str());
        }
        if !self.guess {
            return None;
        }
        let bare = extension.strip_prefix('.').unwrap_or(extension);
        if bare.is_empty() {
            return None;
        }
        mime_guess::from_ext(bare).first_raw()
    }
}

impl MimeRegistry for MimeTable {
    fn lookup(&self, extension: &str) -> &str {
        self.resolve(extension).unwrap_or(&self.fallback)
    }

    fn fallback(&self) -> &str {
        &self.fallback
    }

    fn is_known(&self, extension: &str) -> bool {
        self.resolve(extension).is_some()
    }
}

fn normalize(extension: &str) -> String {
    let lower = extension.to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
