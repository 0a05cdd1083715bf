//! Path helpers shared by the extractor and the CLI

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Source file extensions handed to the analyzer
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Directories never searched for sources
const IGNORED_DIRS: &[&str] = &[".git", ".svn", ".hg", "build", "_build", "target", "reports"];

/// Extracts the filesystem path from an artifact URI.
///
/// `file://<host>/a/b.c` yields `/a/b.c` whatever the host is. A `file:` URI
/// without authority keeps its path, and a string without a scheme is
/// returned unchanged. Query and fragment suffixes are dropped. Returns `None`
/// when no path remains.
pub fn uri_to_path(uri: &str) -> Option<&str> {
    let path = match uri.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "",
        },
        _ => uri.strip_prefix("file:").unwrap_or(uri),
    };

    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| IGNORED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Finds C/C++ sources below `root_dir`, sorted for a stable command line
pub fn find_sources(root_dir: &Path) -> crate::Result<Vec<PathBuf>> {
    if !root_dir.is_dir() {
        return Err(crate::CpptestError::ConfigError(format!(
            "Source directory not found: {}",
            root_dir.display()
        )));
    }

    tracing::debug!("Searching sources in: {}", root_dir.display());

    let mut sources = Vec::new();
    for entry in WalkDir::new(root_dir)
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);

        if is_source {
            tracing::trace!("Source found: {}", path.display());
            sources.push(path.to_path_buf());
        }
    }

    sources.sort();
    tracing::debug!("Total sources found: {}", sources.len());
    Ok(sources)
}
