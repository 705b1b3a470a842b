//! Filesystem resource served by the HTTP layer
//!
//! A [`FileResource`] points at one path. It can read, create, append to and
//! remove that path, list it as a directory, and work out which MIME
//! extension applies to it. Every failure is logged through the context's
//! [`Logger`] and returned as a [`ResourceError`].

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use crate::dir::{DirectoryProvider, FsDirectory};
use crate::error::{ResourceError, Result};
use crate::extension::{self, squeeze_slashes};
use crate::handle::{FileHandle, OpenMode};
use crate::listing::{self, ListingEntry};
use crate::log::{LogRecord, Logger, TracingLogger};
use crate::mime::{MimeRegistry, MimeTable};

const READ_CHUNK: usize = 4096;

/// Collaborators a [`FileResource`] relies on
#[derive(Clone)]
pub struct ResourceContext {
    pub mimes: Arc<dyn MimeRegistry>,
    pub logger: Arc<dyn Logger>,
    pub dirs: Arc<dyn DirectoryProvider>,
}

impl ResourceContext {
    pub fn new(
        mimes: Arc<dyn MimeRegistry>,
        logger: Arc<dyn Logger>,
        dirs: Arc<dyn DirectoryProvider>,
    ) -> Self {
        Self { mimes, logger, dirs }
    }

    pub fn with_mimes(mut self, mimes: Arc<dyn MimeRegistry>) -> Self {
        self.mimes = mimes;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_dirs(mut self, dirs: Arc<dyn DirectoryProvider>) -> Self {
        self.dirs = dirs;
        self
    }
}

impl Default for ResourceContext {
    /// `mime_guess` types, `tracing` output, the real filesystem
    fn default() -> Self {
        Self::new(
            Arc::new(MimeTable::new()),
            Arc::new(TracingLogger),
            Arc::new(FsDirectory),
        )
    }
}

impl std::fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceContext")
            .field("fallback", &self.mimes.fallback())
            .finish_non_exhaustive()
    }
}

/// A path on disk plus, once opened, its file handle
#[derive(Debug)]
pub struct FileResource {
    ctx: ResourceContext,
    path: String,
    handle: FileHandle,
    file_name_full: String,
    file_name: String,
    mime_extension: String,
    matches: Vec<String>,
}

impl FileResource {
    /// Resource with an empty path
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            path: String::new(),
            handle: FileHandle::default(),
            file_name_full: String::new(),
            file_name: String::new(),
            mime_extension: String::new(),
            matches: Vec::new(),
        }
    }

    /// Resource pointed at `path`, extension derived without negotiation
    pub fn with_path(ctx: ResourceContext, path: &str) -> Self {
        let mut resource = Self::new(ctx);
        resource.set_path(path, false);
        resource
    }

    /// Point at a new path and re-derive name and extension.
    ///
    /// With `negotiate`, the extension walks back through the suffix chain
    /// until the MIME registry recognises it. A path ending in `/` keeps the
    /// previously derived names.
    pub fn set_path(&mut self, path: &str, negotiate: bool) {
        self.path = squeeze_slashes(path);

        let registry = negotiate.then_some(self.ctx.mimes.as_ref());
        if let Some(derived) = extension::derive_name(&self.path, registry) {
            self.file_name_full = derived.full;
            self.file_name = derived.name;
            self.mime_extension = derived.extension;
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_name_full(&self) -> &str {
        &self.file_name_full
    }

    pub fn mime_extension(&self) -> &str {
        &self.mime_extension
    }

    /// MIME type of the derived extension
    pub fn mime_type(&self) -> &str {
        self.ctx.mimes.lookup(&self.mime_extension)
    }

    /// Sibling variants found by the last [`FileResource::parse_match`]
    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn handle(&self) -> Option<&std::fs::File> {
        self.handle.file()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Open the path, read-only or (with `create`) created and truncated.
    ///
    /// Any previously open handle is closed first.
    pub fn open(&mut self, create: bool) -> bool {
        self.try_open(create).is_ok()
    }

    /// Typed form of [`FileResource::open`]
    pub fn try_open(&mut self, create: bool) -> Result<()> {
        let mode = if create { OpenMode::Create } else { OpenMode::Read };
        self.handle
            .open(&self.path, mode)
            .map_err(|source| ResourceError::Open {
                path: self.path.clone(),
                source,
            })
    }

    pub fn close(&mut self) {
        self.handle.close();
    }

    /// Create (or truncate) the file and write `body` into it.
    ///
    /// The handle stays open afterwards.
    pub fn create(&mut self, body: impl AsRef<[u8]>) -> Result<()> {
        if let Err(err) = self.try_open(true) {
            self.report("create", &err);
            return Err(err);
        }
        self.write_body("create", body.as_ref())
    }

    /// Append `body` to an existing file. A missing file is not logged.
    pub fn append(&mut self, body: impl AsRef<[u8]>) -> Result<()> {
        self.handle.close();
        self.handle
            .open(&self.path, OpenMode::Append)
            .map_err(|source| ResourceError::Open {
                path: self.path.clone(),
                source,
            })?;
        self.write_body("append", body.as_ref())
    }

    fn write_body(&mut self, operation: &str, body: &[u8]) -> Result<()> {
        if body.is_empty() {
            return Ok(());
        }
        let written = match self.handle.file_mut() {
            Some(file) => file.write_all(body),
            None => Err(std::io::Error::from(ErrorKind::NotConnected)),
        };
        written.map_err(|source| {
            let err = ResourceError::Write {
                path: self.path.clone(),
                source,
            };
            self.report(operation, &err);
            err
        })
    }

    /// Remove the path. Nothing happens when it does not exist.
    pub fn unlink(&mut self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path).map_err(|source| {
            let err = ResourceError::Unlink {
                path: self.path.clone(),
                source,
            };
            self.report("unlink", &err);
            err
        })
    }

    /// Whole content of the open file, read from the start
    pub fn get_bytes(&mut self) -> Result<Vec<u8>> {
        let path = self.path.clone();
        let Some(file) = self.handle.file_mut() else {
            return Err(ResourceError::NotOpen { path });
        };

        match read_all(file) {
            Ok(content) => Ok(content),
            Err(source) => {
                let err = ResourceError::Read { path, source };
                self.report("read", &err);
                Err(err)
            }
        }
    }

    /// [`FileResource::get_bytes`] as text; invalid UTF-8 is replaced
    pub fn get_content(&mut self) -> Result<String> {
        let bytes = self.get_bytes()?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    /// HTML listing of the directory at this path.
    ///
    /// The first entry the directory yields (`.` on POSIX) is skipped.
    pub fn auto_index(&self, target: &str) -> Result<String> {
        let mut dir = self.open_dir()?;

        let mut entries = Vec::new();
        let mut first = true;
        loop {
            let name = match dir.read() {
                Ok(Some(name)) => name,
                Ok(None) => break,
                Err(source) => {
                    self.log_io("readdir", &source);
                    break;
                }
            };
            if std::mem::take(&mut first) {
                continue;
            }

            let entry_path = format!("{}/{}", self.path, name);
            match self.ctx.dirs.stat(&entry_path) {
                Ok(meta) => entries.push(ListingEntry::new(&name, meta.is_dir, meta.modified, meta.size)),
                Err(source) => self.log_io("stat", &source),
            }
        }
        drop(dir);

        let entries = listing::sort_entries(entries);
        tracing::debug!("autoindex {} ({} entries)", self.path, entries.len());
        Ok(listing::render(target, &entries))
    }

    pub fn is_directory(&self) -> bool {
        self.ctx
            .dirs
            .stat(&self.path)
            .map(|meta| meta.is_dir)
            .unwrap_or(false)
    }

    pub fn exists(&self) -> bool {
        self.exists_at(&self.path)
    }

    /// Whether some other path exists
    pub fn exists_at(&self, path: &str) -> bool {
        self.ctx.dirs.stat(path).is_ok()
    }

    /// Modification time as an HTTP date
    pub fn last_modified(&self) -> Option<String> {
        self.ctx
            .dirs
            .stat(&self.path)
            .ok()
            .map(|meta| httpdate::fmt_http_date(meta.modified))
    }

    /// `"/" + name` of the first directory entry matching any candidate.
    ///
    /// Entries are scanned in enumeration order, so the directory decides
    /// which candidate wins, not the order of `candidates`.
    pub fn find_index<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Option<String>> {
        let mut dir = self.open_dir()?;
        loop {
            match dir.read() {
                Ok(Some(name)) => {
                    if candidates.iter().any(|c| c.as_ref() == name) {
                        return Ok(Some(format!("/{}", name)));
                    }
                }
                Ok(None) => return Ok(None),
                Err(source) => {
                    self.log_io("readdir", &source);
                    return Ok(None);
                }
            }
        }
    }

    /// Collect siblings that share the file name and contain the extension,
    /// e.g. `page.en.html` and `page.fr.html` for `page.html`.
    pub fn parse_match(&mut self) -> Result<()> {
        self.matches.clear();

        let parent = match self.path.rfind('/') {
            Some(0) => "/",
            Some(sep) => &self.path[..sep],
            None => ".",
        };
        let mut dir = self.ctx.dirs.open(parent).map_err(|source| {
            let err = ResourceError::DirectoryOpen {
                path: parent.to_string(),
                source,
            };
            self.report("opendir", &err);
            err
        })?;

        loop {
            match dir.read() {
                Ok(Some(name)) => {
                    if name != self.file_name_full
                        && name.starts_with(&self.file_name)
                        && name.contains(&self.mime_extension)
                    {
                        self.matches.push(name);
                    }
                }
                Ok(None) => break,
                Err(source) => {
                    self.log_io("readdir", &source);
                    break;
                }
            }
        }
        Ok(())
    }

    fn open_dir(&self) -> Result<crate::dir::DirHandle> {
        self.ctx.dirs.open(&self.path).map_err(|source| {
            let err = ResourceError::DirectoryOpen {
                path: self.path.clone(),
                source,
            };
            self.report("opendir", &err);
            err
        })
    }

    fn report(&self, operation: &str, err: &ResourceError) {
        match err {
            ResourceError::Open { source, path }
            | ResourceError::Write { source, path }
            | ResourceError::Read { source, path }
            | ResourceError::DirectoryOpen { source, path }
            | ResourceError::Unlink { source, path } => {
                self.ctx.logger.log(LogRecord::io_failure(operation, source, path));
            }
            ResourceError::NotOpen { .. } => {}
        }
    }

    fn log_io(&self, operation: &str, source: &std::io::Error) {
        self.ctx
            .logger
            .log(LogRecord::io_failure(operation, source, &self.path));
    }
}

fn read_all(file: &mut std::fs::File) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut content = Vec::new();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match file.read(&mut buf) {
            Ok(0) => return Ok(content),
            Ok(n) => content.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
