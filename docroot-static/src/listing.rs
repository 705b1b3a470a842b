//! Directory listing rendering

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::time::SystemTime;

use crate::extension::squeeze_slashes;

/// Names longer than this are shortened in the listing
pub const MAX_NAME_LEN: usize = 50;
const TRUNCATED_LEN: usize = 47;
const TRUNCATION_MARKER: &str = "..>";

/// Column where the date of an entry ends
const DATE_COLUMN: usize = 68;
const SIZE_WIDTH: usize = 20;

/// Characters escaped in listing links. `/` stays literal.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Entry name, with a trailing `/` for directories
    pub link: String,
    /// Name as shown, possibly truncated
    pub display: String,
    /// `display` ends in the truncation marker
    pub truncated: bool,
    pub is_dir: bool,
    /// `%d-%b-%Y %H:%M`, UTC
    pub date: String,
    pub size: u64,
}

impl ListingEntry {
    pub fn new(name: &str, is_dir: bool, modified: SystemTime, size: u64) -> Self {
        let mut display = truncate_name(name);
        let truncated = name.chars().count() > MAX_NAME_LEN;
        let mut link = name.to_string();
        if is_dir {
            display.push('/');
            link.push('/');
        }
        Self {
            link,
            display,
            truncated,
            is_dir,
            date: listing_date(modified),
            size,
        }
    }
}

/// Shorten names over [`MAX_NAME_LEN`] characters to 47 plus `..>`
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        return name.to_string();
    }
    let mut short: String = name.chars().take(TRUNCATED_LEN).collect();
    short.push_str(TRUNCATION_MARKER);
    short
}

pub fn listing_date(modified: SystemTime) -> String {
    DateTime::<Utc>::from(modified).format("%d-%b-%Y %H:%M").to_string()
}

/// Directories first, then files; each group ascending by name
pub fn sort_entries(entries: Vec<ListingEntry>) -> Vec<ListingEntry> {
    let (mut dirs, mut files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);
    dirs.sort_by(|a, b| a.display.cmp(&b.display));
    files.sort_by(|a, b| a.display.cmp(&b.display));
    dirs.extend(files);
    dirs
}

/// Render sorted entries as an HTML page titled `Index of {target}`.
///
/// The first row carries no date or size columns.
pub fn render(target: &str, entries: &[ListingEntry]) -> String {
    let title = escape_html(target);
    let mut body = String::new();
    body.push_str("<html>\r\n");
    body.push_str(&format!("<head><title>Index of {}</title></head>\r\n", title));
    body.push_str("<body>\r\n");
    body.push_str(&format!("<h1>Index of {}</h1><hr><pre>", title));

    for (i, entry) in entries.iter().enumerate() {
        let href = squeeze_slashes(&format!("{}/{}", target, entry.link));
        body.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            utf8_percent_encode(&href, HREF),
            display_html(entry)
        ));
        if i > 0 {
            let width = DATE_COLUMN.saturating_sub(entry.display.chars().count());
            body.push_str(&format!("{:>width$}", entry.date, width = width));
            let size = if entry.is_dir {
                "-".to_string()
            } else {
                entry.size.to_string()
            };
            body.push_str(&format!("{:>width$}", size, width = SIZE_WIDTH));
        }
        body.push_str("\r\n");
    }

    body.push_str("</pre><hr></body>\r\n");
    body.push_str("</html>\r\n");
    body
}

// The marker is markup, only the kept name is escaped
fn display_html(entry: &ListingEntry) -> String {
    if !entry.truncated {
        return escape_html(&entry.display);
    }
    let split = entry
        .display
        .char_indices()
        .nth(TRUNCATED_LEN)
        .map_or(entry.display.len(), |(i, _)| i);
    let (kept, marker) = entry.display.split_at(split);
    format!("{}{}", escape_html(kept), marker)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
