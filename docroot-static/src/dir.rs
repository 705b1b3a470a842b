//! Directory enumeration and stat
//!
//! Everything that depends on enumeration order goes through a
//! [`DirectoryProvider`] so tests can seed a fixed listing.

use std::io;
use std::time::SystemTime;

/// Stat result for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
}

type Entries = Box<dyn Iterator<Item = io::Result<String>> + Send>;

/// An open directory stream. Dropping it closes the directory.
pub struct DirHandle {
    path: String,
    entries: Option<Entries>,
}

impl DirHandle {
    pub fn new(path: impl Into<String>, entries: Entries) -> Self {
        Self {
            path: path.into(),
            entries: Some(entries),
        }
    }

    /// Directory this handle enumerates
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Next entry name in enumeration order, `Ok(None)` at the end
    pub fn read(&mut self) -> io::Result<Option<String>> {
        match self.entries.as_mut().and_then(|entries| entries.next()) {
            Some(entry) => entry.map(Some),
            None => Ok(None),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.entries.is_none()
    }

    /// Release the stream early
    pub fn close(&mut self) {
        if self.entries.take().is_some() {
            tracing::trace!("closedir {}", self.path);
        }
    }
}

impl Drop for DirHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DirHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirHandle")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Source of directory listings and stat information
pub trait DirectoryProvider: Send + Sync {
    /// Open `path` for enumeration
    fn open(&self, path: &str) -> io::Result<DirHandle>;

    /// Stat `path`, following symlinks
    fn stat(&self, path: &str) -> io::Result<EntryMeta>;
}

/// The real filesystem.
///
/// Enumeration yields `.` and `..` ahead of the real entries, the way
/// POSIX `readdir` does; `std::fs::read_dir` skips them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectory;

impl DirectoryProvider for FsDirectory {
    fn open(&self, path: &str) -> io::Result<DirHandle> {
        let read_dir = std::fs::read_dir(path)?;
        let dots = [".", ".."].into_iter().map(|name| Ok(name.to_string()));
        let names = read_dir.map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()));
        Ok(DirHandle::new(path, Box::new(dots.chain(names))))
    }

    fn stat(&self, path: &str) -> io::Result<EntryMeta> {
        let metadata = std::fs::metadata(path)?;
        Ok(EntryMeta {
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified()?,
        })
    }
}
