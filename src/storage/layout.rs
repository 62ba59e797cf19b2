//! Destination layout
//!
//! `<root>/<mode>/<JUR>/<slug>/.../<leaf-slug>.txt`. Segments come from URL
//! slugs. Sanitizing and truncation can map two sibling URLs to the same
//! segment, so the walker runs each listing through [`SiblingSegments`],
//! which suffixes a short URL hash onto any repeat.

use crate::targets::Mode;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Longest segment we will put on disk
const MAX_SEGMENT_LEN: usize = 120;

/// Extension of mirrored documents
pub const DOCUMENT_EXTENSION: &str = "txt";

/// Suffix of in-progress temp files
pub const TEMP_SUFFIX: &str = "part";

/// Last non-empty path segment of a URL
pub fn url_slug(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Makes a string safe to use as a single path component
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; everything else becomes `_`.
/// Leading dots are stripped so a segment can never be `.`/`..` or hidden.
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let mut segment: String = trimmed.chars().take(MAX_SEGMENT_LEN).collect();
    if segment.is_empty() {
        segment.push('_');
    }
    segment
}

/// Path segment for a child node: its URL slug, or its name when the URL has none
pub fn child_segment(url: &Url, name: &str) -> String {
    match url_slug(url) {
        Some(slug) => sanitize_segment(&slug),
        None => sanitize_segment(name),
    }
}

/// Hex characters of the URL hash appended to a repeated segment
const HASH_SUFFIX_LEN: usize = 8;

/// Assigns on-disk segments to the children of one listing
///
/// Names are compared case-insensitively, and a leaf is compared by its file
/// name (`<segment>.txt`), so neither a case-folding filesystem nor a
/// directory called `x.txt` next to a leaf `x` can make two children share a
/// path. The first child keeps the plain segment; later ones get
/// `<segment>-<hash>`, which is stable across runs.
#[derive(Debug, Default)]
pub struct SiblingSegments {
    taken: HashSet<String>,
}

impl SiblingSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a segment for `url` not used by any earlier sibling
    pub fn assign(&mut self, url: &Url, name: &str, is_leaf: bool) -> String {
        let segment = child_segment(url, name);
        if self.taken.insert(disk_key(&segment, is_leaf)) {
            return segment;
        }

        let hash = hex::encode(Sha256::digest(url.as_str().as_bytes()));
        let prefix: String = segment
            .chars()
            .take(MAX_SEGMENT_LEN - HASH_SUFFIX_LEN - 1)
            .collect();
        let mut unique = format!("{}-{}", prefix, &hash[..HASH_SUFFIX_LEN]);
        let mut n = 1;
        while !self.taken.insert(disk_key(&unique, is_leaf)) {
            unique = format!("{}-{}-{}", prefix, &hash[..HASH_SUFFIX_LEN], n);
            n += 1;
        }
        tracing::debug!("Segment {} already taken, storing {} as {}", segment, url, unique);
        unique
    }
}

fn disk_key(segment: &str, is_leaf: bool) -> String {
    let key = if is_leaf {
        format!("{}.{}", segment, DOCUMENT_EXTENSION)
    } else {
        segment.to_string()
    };
    key.to_ascii_lowercase()
}

/// Deterministic file path for a leaf
pub fn destination_path(root: &Path, mode: Mode, segments: &[String]) -> PathBuf {
    let mut path = root.join(mode.dir_name());
    if let Some((last, dirs)) = segments.split_last() {
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{}.{}", last, DOCUMENT_EXTENSION));
    }
    path
}

/// Fresh temp file next to `destination`, used by the atomic writer
///
/// Every call returns a new name, so two writes never share a temp file.
pub fn temp_path(destination: &Path) -> PathBuf {
    destination.with_file_name(format!(
        "{}{}.{}",
        temp_prefix(destination),
        uuid::Uuid::new_v4().simple(),
        TEMP_SUFFIX
    ))
}

/// Returns true if `file_name` is a temp file left by a write to `destination`
pub fn is_temp_for(destination: &Path, file_name: &str) -> bool {
    file_name.starts_with(&temp_prefix(destination))
        && file_name.ends_with(&format!(".{}", TEMP_SUFFIX))
}

fn temp_prefix(destination: &Path) -> String {
    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{}.", file_name)
}
