//! Docroot Static File Module
//!
//! Filesystem resources for static file serving:
//! - Create, append, read and unlink
//! - Directory listings (autoindex) and index file lookup
//! - Extension-chain MIME negotiation

mod dir;
mod error;
mod extension;
mod file_server;
mod handle;
mod listing;
mod log;
mod mime;
mod resource;

pub use dir::{DirHandle, DirectoryProvider, EntryMeta, FsDirectory};
pub use error::{ResourceError, Result};
pub use extension::{DerivedName, derive_name, last_segment, squeeze_slashes};
pub use file_server::{FileServer, ServedFile};
pub use handle::{CREATE_MODE, FileHandle, OpenMode};
pub use listing::{ListingEntry, MAX_NAME_LEN};
pub use log::{Color, Level, LogRecord, Logger, MemoryLogger, TracingLogger};
pub use mime::{DEFAULT_MIME, MimeRegistry, MimeTable};
pub use resource::{FileResource, ResourceContext};
