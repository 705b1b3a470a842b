//! File name and extension derivation
//!
//! `report.tar.gz` splits into the name `report` and the suffix chain
//! `.tar.gz`. Plain derivation takes the last link of the chain (`.gz`).
//! Negotiation walks the chain backwards until the MIME registry knows the
//! candidate, so `page.html.en` resolves to `.html`.

use crate::mime::MimeRegistry;

/// Names derived from the last segment of a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedName {
    /// Whole last segment
    pub full: String,
    /// Segment up to the first dot
    pub name: String,
    /// Extension used for MIME resolution, empty when there is no dot
    pub extension: String,
}

/// Derive names from `path`.
///
/// Returns `None` when the last segment is empty (the path ends in `/`).
pub fn derive_name(path: &str, negotiate: Option<&dyn MimeRegistry>) -> Option<DerivedName> {
    let full = last_segment(path);
    if full.is_empty() {
        return None;
    }

    let (name, suffix) = match full.find('.') {
        Some(dot) => full.split_at(dot),
        None => (full, ""),
    };

    let extension = match negotiate {
        Some(registry) => negotiated_extension(suffix, registry),
        None => plain_extension(suffix),
    };

    Some(DerivedName {
        full: full.to_string(),
        name: name.to_string(),
        extension: extension.to_string(),
    })
}

/// Text after the last `/`
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Collapse runs of `/` into a single separator
pub fn squeeze_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' && prev_slash {
            continue;
        }
        prev_slash = c == '/';
        out.push(c);
    }
    out
}

fn plain_extension(suffix: &str) -> &str {
    match suffix.rfind('.') {
        Some(last) => &suffix[last..],
        None => "",
    }
}

// `suffix` always starts at the first dot, so index 0 ends the walk.
fn negotiated_extension<'a>(suffix: &'a str, registry: &dyn MimeRegistry) -> &'a str {
    let Some(mut last) = suffix.rfind('.') else {
        return "";
    };
    let mut extension = &suffix[last..];

    while !registry.is_known(extension) {
        let Some(earlier) = suffix[..last].rfind('.') else {
            break;
        };
        extension = &suffix[earlier..last];
        last = earlier;
        if last == 0 {
            break;
        }
    }
    extension
}
