//! File server implementation

use docroot_core::config::FilesConfig;

use crate::error::Result;
use crate::resource::{FileResource, ResourceContext};

/// Response from file server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    pub content: Vec<u8>,
    pub mime_type: String,
    /// Filesystem path the content came from
    pub path: String,
    pub last_modified: Option<String>,
    /// True when `content` is a generated directory listing
    pub listing: bool,
}

/// Static file server over a document root
#[derive(Debug, Clone)]
pub struct FileServer {
    config: FilesConfig,
    ctx: ResourceContext,
}

impl FileServer {
    /// Create a new file server
    pub fn new(config: FilesConfig, ctx: ResourceContext) -> Self {
        Self { config, ctx }
    }

    /// Create a file server for a directory with default settings
    pub fn serve_dir(root: impl Into<String>) -> Self {
        Self::new(
            FilesConfig {
                root: root.into(),
                ..Default::default()
            },
            ResourceContext::default(),
        )
    }

    /// Enable or disable directory listings
    pub fn with_autoindex(mut self, enable: bool) -> Self {
        self.config.autoindex = enable;
        self
    }

    pub fn config(&self) -> &FilesConfig {
        &self.config
    }

    /// Resolve a request path against the root.
    ///
    /// `Ok(None)` means nothing can be served: the path does not exist,
    /// escapes the root, or is a directory without index while listings are
    /// disabled.
    pub fn serve(&self, request_path: &str) -> Result<Option<ServedFile>> {
        if request_path.split('/').any(|segment| segment == "..") {
            tracing::debug!("Rejecting path traversal: {}", request_path);
            return Ok(None);
        }

        let mut file_path = format!("{}/{}", self.config.root, request_path.trim_start_matches('/'));
        let mut resource = FileResource::new(self.ctx.clone());
        resource.set_path(&file_path, self.config.negotiate);

        tracing::debug!("Serving request: {} -> {}", request_path, resource.path());

        if !resource.exists() {
            return Ok(None);
        }

        if resource.is_directory() {
            match resource.find_index(self.config.index.as_slice())? {
                Some(index) => {
                    file_path = format!("{}{}", file_path.trim_end_matches('/'), index);
                    resource.set_path(&file_path, self.config.negotiate);
                }
                None if self.config.autoindex => {
                    let target = listing_target(request_path);
                    let html = resource.auto_index(&target)?;
                    return Ok(Some(ServedFile {
                        content: html.into_bytes(),
                        mime_type: "text/html; charset=utf-8".to_string(),
                        path: resource.path().to_string(),
                        last_modified: None,
                        listing: true,
                    }));
                }
                None => return Ok(None),
            }
        }

        resource.try_open(false)?;
        let content = resource.get_bytes()?;
        resource.close();

        Ok(Some(ServedFile {
            content,
            mime_type: resource.mime_type().to_string(),
            path: resource.path().to_string(),
            last_modified: resource.last_modified(),
            listing: false,
        }))
    }
}

// "/docs/" lists as "/docs" so entry links come out as "/docs/name"
fn listing_target(request_path: &str) -> String {
    let trimmed = request_path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::MimeTable;
    use std::sync::Arc;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
        std::fs::create_dir(dir.path().join("raw")).unwrap();
        std::fs::write(dir.path().join("raw/data.bin"), [0u8, 1, 2]).unwrap();
        dir
    }

    fn server(dir: &tempfile::TempDir) -> FileServer {
        FileServer::serve_dir(dir.path().to_str().unwrap())
    }

    #[test]
    fn test_serve_file() {
        let dir = site();
        let served = server(&dir).serve("/style.css").unwrap().unwrap();
        assert_eq!(served.content, b"body {}");
        assert_eq!(served.mime_type, "text/css");
        assert!(!served.listing);
        assert!(served.last_modified.is_some());
    }

    #[test]
    fn test_serve_index() {
        let dir = site();
        let served = server(&dir).serve("/docs/").unwrap().unwrap();
        assert_eq!(served.content, b"<h1>docs</h1>");
        assert_eq!(served.mime_type, "text/html");
        assert!(served.path.ends_with("/docs/index.html"));
    }

    #[test]
    fn test_serve_listing() {
        let dir = site();
        let served = server(&dir).serve("/raw").unwrap().unwrap();
        assert!(served.listing);
        let html = String::from_utf8(served.content).unwrap();
        assert!(html.contains("<title>Index of /raw</title>"));
        assert!(html.contains("<a href=\"/raw/data.bin\">data.bin</a>"));
    }

    #[test]
    fn test_listing_disabled() {
        let dir = site();
        let server = server(&dir).with_autoindex(false);
        assert!(server.serve("/raw").unwrap().is_none());
    }

    #[test]
    fn test_missing_and_traversal() {
        let dir = site();
        let server = server(&dir);
        assert!(server.serve("/nope.txt").unwrap().is_none());
        assert!(server.serve("/docs/../../etc/passwd").unwrap().is_none());
    }

    #[test]
    fn test_negotiated_type() {
        let dir = site();
        std::fs::write(dir.path().join("page.html.xyzzy"), "<p>hello</p>").unwrap();

        let config = FilesConfig {
            root: dir.path().to_str().unwrap().to_string(),
            ..Default::default()
        };
        let mimes = MimeTable::new().with_fallback("application/octet-stream");
        let ctx = ResourceContext::default().with_mimes(Arc::new(mimes));
        let served = FileServer::new(config.clone(), ctx.clone())
            .serve("/page.html.xyzzy")
            .unwrap()
            .unwrap();
        assert_eq!(served.mime_type, "text/html");

        let plain = FilesConfig { negotiate: false, ..config };
        let served = FileServer::new(plain, ctx).serve("/page.html.xyzzy").unwrap().unwrap();
        assert_eq!(served.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_listing_target() {
        assert_eq!(listing_target("/"), "/");
        assert_eq!(listing_target(""), "/");
        assert_eq!(listing_target("/docs/"), "/docs");
        assert_eq!(listing_target("docs"), "/docs");
    }
}
