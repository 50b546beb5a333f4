//! Directory traversal with subtree pruning.
//!
//! Excluded and ignored directories are pruned before descent, so vendor
//! trees and caches are never visited at all.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{GistError, Result};
use super::filter::PathFilter;
use super::language::Language;

/// Walks a root directory, yielding files with a supported extension.
pub struct Walker {
    filter: PathFilter,
}

impl Walker {
    pub fn new(filter: PathFilter) -> Self {
        Self { filter }
    }

    /// Lazily yield supported, non-ignored files under `root`.
    ///
    /// Traversal is depth-first, sorted by file name per directory so the
    /// order is stable across runs. Listing errors surface as `Err` items
    /// and are fatal to the caller.
    pub fn walk(&self, root: &Path) -> Result<impl Iterator<Item = Result<PathBuf>> + '_> {
        let root = root.canonicalize().map_err(|source| GistError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let filter = &self.filter;
        let prune_root = root.clone();

        let entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                // Never filter the root itself
                if entry.path() == prune_root {
                    return true;
                }
                if !entry.file_type().is_dir() {
                    return true;
                }
                let rel = entry.path().strip_prefix(&prune_root).unwrap_or(entry.path());
                !filter.is_excluded(rel, true)
            });

        Ok(entries.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.clone());
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Some(Err(GistError::Io { path, source }));
                }
            };

            if !entry.file_type().is_file() {
                return None;
            }
            if Language::from_path(entry.path()).is_none() {
                return None;
            }

            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            if self.filter.is_excluded(rel, false) {
                return None;
            }

            Some(Ok(entry.path().to_path_buf()))
        }))
    }
}
