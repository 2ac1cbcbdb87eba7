//! Input tree discovery.
//!
//! Walks the input root recursively and classifies every file by suffix:
//!
//! ```text
//! input/
//! ├── global.json          # Ignored (variables, read by the resolver)
//! ├── index.html           # Source → rendered to output/index.html
//! ├── base.template        # Ignored (partial, loaded only via include/extends)
//! ├── blog/
//! │   └── first.md         # Source → rendered to output/blog/first.md
//! └── assets/
//!     └── logo.png         # Asset → hard-linked to output/assets/logo.png
//! ```
//!
//! Directories are traversed, never emitted. Paths are kept relative to the
//! root and joined against it explicitly; the working directory is never
//! changed.

use crate::config::SuffixConfig;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {0}")]
    MissingRoot(PathBuf),
}

/// How a discovered file is handled by the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Rendered as a page (front-matter, conversion, templates).
    Source,
    /// Dropped: never written to the output.
    Ignored,
    /// Mirrored into the output unchanged.
    Asset,
}

/// A file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the input root.
    pub rel_path: PathBuf,
    /// Last extension including the dot (`".md"`), empty when there is none.
    pub suffix: String,
    pub kind: SourceKind,
}

impl SourceFile {
    /// Name the template engine knows this file by: the relative path with
    /// `/` separators on every platform.
    pub fn template_name(&self) -> String {
        template_name(&self.rel_path)
    }
}

/// Enumerate and classify every file under `root`.
///
/// Entries are sorted by file name at each level so repeated runs see the
/// same order. Unreadable entries are logged and skipped.
pub fn scan(root: &Path, suffixes: &SuffixConfig) -> Result<Vec<SourceFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        let suffix = suffix_of(rel_path);
        let kind = classify(&suffix, suffixes);
        files.push(SourceFile {
            rel_path: rel_path.to_path_buf(),
            suffix,
            kind,
        });
    }
    Ok(files)
}

/// Classify a suffix. Source wins over ignored when a suffix is in both lists.
pub fn classify(suffix: &str, suffixes: &SuffixConfig) -> SourceKind {
    if suffixes.is_source(suffix) {
        SourceKind::Source
    } else if suffixes.is_ignored(suffix) {
        SourceKind::Ignored
    } else {
        SourceKind::Asset
    }
}

/// Last extension of a path with its leading dot.
///
/// - `blog/post.md` → `".md"`
/// - `archive.tar.gz` → `".gz"`
/// - `Makefile` → `""`
/// - `.htaccess` → `""` (a leading dot starts a name, not an extension)
pub fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Join path components with `/`.
pub fn template_name(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `rel` names something under the input root: non-empty, relative,
/// and free of `..`.
pub fn stays_inside_root(rel: &Path) -> bool {
    !rel.as_os_str().is_empty()
        && rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
