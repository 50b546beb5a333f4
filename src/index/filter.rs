//! Path inclusion rules: hard-coded excludes plus .gitignore patterns.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use super::error::{GistError, Result};

/// Directory basenames that are always skipped, independent of .gitignore.
const EXCLUDED_DIR_NAMES: &[&str] = &[
    ".git",
    ".gist",
    ".venv",
    ".mypy_cache",
    ".pytest_cache",
    "__pycache__",
    "node_modules",
    "dist",
    "build",
    "target",
    ".tox",
    ".ruff_cache",
    ".idea",
    ".vscode",
];

/// Decides whether a root-relative path participates in indexing.
///
/// The decision is pure: the matcher is compiled once from the root's
/// .gitignore (if present) and consulted without further filesystem access.
pub struct PathFilter {
    gitignore: Gitignore,
}

impl PathFilter {
    /// Compile a filter from the .gitignore under `root`, if one exists.
    pub fn from_root(root: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);

        let gitignore_path = root.join(".gitignore");
        if gitignore_path.exists() {
            if let Some(err) = builder.add(&gitignore_path) {
                return Err(GistError::Parse(format!(
                    "invalid .gitignore at {}: {err}",
                    gitignore_path.display()
                )));
            }
        }

        let gitignore = builder
            .build()
            .map_err(|err| GistError::Parse(format!("failed to compile ignore rules: {err}")))?;

        Ok(Self { gitignore })
    }

    /// Whether a root-relative path is excluded from indexing.
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        if is_dir {
            let basename = rel_path.file_name().and_then(|n| n.to_str());
            if let Some(name) = basename {
                if EXCLUDED_DIR_NAMES.contains(&name) {
                    return true;
                }
            }
        }

        self.gitignore.matched(rel_path, is_dir).is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn filter_with_gitignore(lines: &str) -> (TempDir, PathFilter) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), lines).unwrap();
        let filter = PathFilter::from_root(dir.path()).unwrap();
        (dir, filter)
    }

    #[test]
    fn test_hard_coded_dirs_always_excluded() {
        let dir = TempDir::new().unwrap();
        let filter = PathFilter::from_root(dir.path()).unwrap();

        assert!(filter.is_excluded(&PathBuf::from(".git"), true));
        assert!(filter.is_excluded(&PathBuf::from("node_modules"), true));
        assert!(filter.is_excluded(&PathBuf::from("vendor/node_modules"), true));
        assert!(filter.is_excluded(&PathBuf::from(".gist"), true));

        assert!(!filter.is_excluded(&PathBuf::from("src"), true));
        // A file that happens to share an excluded basename is kept
        assert!(!filter.is_excluded(&PathBuf::from("dist"), false));
    }

    #[test]
    fn test_missing_gitignore_matches_nothing() {
        let dir = TempDir::new().unwrap();
        let filter = PathFilter::from_root(dir.path()).unwrap();

        assert!(!filter.is_excluded(&PathBuf::from("anything.py"), false));
        assert!(!filter.is_excluded(&PathBuf::from("some/dir"), true));
    }

    #[test]
    fn test_gitignore_file_pattern() {
        let (_dir, filter) = filter_with_gitignore("ignored.py\n");

        assert!(filter.is_excluded(&PathBuf::from("ignored.py"), false));
        assert!(filter.is_excluded(&PathBuf::from("nested/ignored.py"), false));
        assert!(!filter.is_excluded(&PathBuf::from("kept.py"), false));
    }

    #[test]
    fn test_gitignore_directory_only_pattern() {
        let (_dir, filter) = filter_with_gitignore("subdir/\n");

        assert!(filter.is_excluded(&PathBuf::from("subdir"), true));
        // Directory-only patterns do not match a plain file of the same name
        assert!(!filter.is_excluded(&PathBuf::from("subdir"), false));
    }

    #[test]
    fn test_gitignore_glob_pattern() {
        let (_dir, filter) = filter_with_gitignore("*.generated.ts\n");

        assert!(filter.is_excluded(&PathBuf::from("api.generated.ts"), false));
        assert!(!filter.is_excluded(&PathBuf::from("api.ts"), false));
    }
}
