//! Owned file handle

use std::fs::{File, OpenOptions};
use std::io;

/// Permission bits for newly created files
pub const CREATE_MODE: u32 = 0o755;

/// How to open a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read only
    Read,
    /// Read-write, created if missing, truncated
    Create,
    /// Read-write appending to an existing file
    Append,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::Create => {
                options.read(true).write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(CREATE_MODE);
                }
            }
            OpenMode::Append => {
                options.read(true).append(true);
            }
        }
        options
    }
}

/// A file that is either open or not. Dropping it closes the file.
#[derive(Debug, Default)]
pub struct FileHandle {
    file: Option<File>,
}

impl FileHandle {
    /// Open `path`, replacing (and closing) whatever was open before
    pub fn open(&mut self, path: &str, mode: OpenMode) -> io::Result<()> {
        self.close();
        let file = mode.options().open(path)?;
        if !is_valid(&file) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "descriptor 0 is not a usable handle",
            ));
        }
        self.file = Some(file);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    pub fn file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    /// Close the file. No-op when nothing is open.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            tracing::trace!("closed file handle");
        }
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.close();
    }
}

// Descriptor 0 never counts as open.
#[cfg(unix)]
fn is_valid(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    file.as_raw_fd() > 0
}

#[cfg(not(unix))]
fn is_valid(_file: &File) -> bool {
    true
}
