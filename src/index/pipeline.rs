//! Indexing pipeline: walk -> extract -> hash/id -> embed -> store.
//!
//! Files are processed strictly one at a time. Each file's blocks are
//! embedded in a single batch call and upserted as one store operation, and
//! a failure in one file never aborts the run.

use std::path::Path;

use tracing::{debug, info};

use crate::embedding::Embedder;
use crate::store::{StoredBlock, VectorStore};

use super::error::{GistError, Result};
use super::extractor::BlockExtractor;
use super::filter::PathFilter;
use super::identity::{block_id, content_hash};
use super::language::Language;
use super::models::IndexStats;
use super::walker::Walker;

struct FileStats {
    blocks_extracted: usize,
    blocks_indexed: usize,
}

/// Orchestrates indexing of a project root into a vector store.
pub struct IndexingPipeline<'a, E: Embedder> {
    walker: Walker,
    extractor: BlockExtractor,
    store: &'a VectorStore,
    embedder: &'a E,
}

impl<'a, E: Embedder> IndexingPipeline<'a, E> {
    pub fn new(filter: PathFilter, store: &'a VectorStore, embedder: &'a E) -> Self {
        Self {
            walker: Walker::new(filter),
            extractor: BlockExtractor::new(),
            store,
            embedder,
        }
    }

    /// Index every supported file under `root`.
    ///
    /// Per-file errors are reported through `on_file_error` and processing
    /// continues; traversal errors are fatal.
    pub async fn index(
        &self,
        root: &Path,
        on_file_error: &mut dyn FnMut(&Path, &GistError),
    ) -> Result<IndexStats> {
        let root = root.canonicalize().map_err(|source| GistError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut stats = IndexStats::default();

        for entry in self.walker.walk(&root)? {
            let file_path = entry?;

            match self.index_file(&root, &file_path).await {
                Ok(Some(file_stats)) => {
                    stats.files_indexed += 1;
                    stats.blocks_extracted += file_stats.blocks_extracted;
                    stats.blocks_indexed += file_stats.blocks_indexed;
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(file = %file_path.display(), %err, "file failed");
                    on_file_error(&file_path, &err);
                }
            }
        }

        info!(
            files = stats.files_indexed,
            blocks = stats.blocks_indexed,
            "indexing complete"
        );

        Ok(stats)
    }

    async fn index_file(&self, root: &Path, file_path: &Path) -> Result<Option<FileStats>> {
        // Walker already filters by extension; re-check defensively.
        let Some(language) = Language::from_path(file_path) else {
            return Ok(None);
        };

        let blocks = self.extractor.extract(file_path)?;
        let rel_filename = relative_filename(root, file_path);

        let stored: Vec<StoredBlock> = blocks
            .iter()
            .map(|block| {
                let content_hash = content_hash(&block.code);
                let block_id = block_id(
                    &rel_filename,
                    block.start_line,
                    block.end_line,
                    &content_hash,
                );
                StoredBlock {
                    block_id,
                    filename: rel_filename.clone(),
                    start_line: block.start_line,
                    end_line: block.end_line,
                    parent_scope: block.parent_scope.clone(),
                    language: language.name().to_string(),
                    content_hash,
                    code: block.code.clone(),
                }
            })
            .collect();

        if !stored.is_empty() {
            let texts: Vec<String> = stored.iter().map(|b| b.code.clone()).collect();
            let embeddings = self.embedder.embed_texts(&texts).await?;
            self.store.upsert_blocks(&stored, &embeddings).await?;
        }

        debug!(file = %rel_filename, blocks = stored.len(), "file indexed");

        Ok(Some(FileStats {
            blocks_extracted: blocks.len(),
            blocks_indexed: stored.len(),
        }))
    }
}

/// Root-relative, forward-slash-normalized filename for stable identity.
fn relative_filename(root: &Path, file_path: &Path) -> String {
    let rel = file_path.strip_prefix(root).unwrap_or(file_path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use anyhow::anyhow;
    use tempfile::TempDir;

    const DIM: usize = 4;

    /// Deterministic embedder: vectors depend only on the text content.
    struct StubEmbedder;

    fn stub_vector(text: &str) -> Vec<f32> {
        if text.contains("needle") {
            vec![1.0, 0.0, 0.0, 0.1]
        } else {
            vec![0.0, 1.0, 0.0, 0.1]
        }
    }

    impl Embedder for StubEmbedder {
        fn dimension(&self) -> usize {
            DIM
        }

        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| stub_vector(t)).collect())
        }

        async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
            Ok(stub_vector(query))
        }
    }

    /// Embedder that fails for any text containing a marker.
    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn dimension(&self) -> usize {
            DIM
        }

        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.iter().any(|t| t.contains("poison")) {
                return Err(GistError::Embedding(anyhow!("backend rejected batch")));
            }
            Ok(texts.iter().map(|t| stub_vector(t)).collect())
        }

        async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
            Ok(stub_vector(query))
        }
    }

    fn write_files(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }
        dir
    }

    async fn open_store(dir: &TempDir) -> VectorStore {
        VectorStore::open(&dir.path().join("store"), DIM).await.unwrap()
    }

    async fn run_index<E: Embedder>(
        root: &Path,
        store: &VectorStore,
        embedder: &E,
    ) -> (IndexStats, Vec<PathBuf>) {
        let filter = PathFilter::from_root(root).unwrap();
        let pipeline = IndexingPipeline::new(filter, store, embedder);

        let mut failed = Vec::new();
        let stats = pipeline
            .index(root, &mut |path, _err| failed.push(path.to_path_buf()))
            .await
            .unwrap();
        (stats, failed)
    }

    #[tokio::test]
    async fn test_index_counts() {
        let dir = write_files(&[
            ("a.py", "def needle(): return 1\n"),
            ("b.py", "def other(): return 2\n\ndef more(): return 3\n"),
            ("plain.py", "x = 1\n"),
        ]);
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;

        let (stats, failed) = run_index(dir.path(), &store, &StubEmbedder).await;

        assert!(failed.is_empty());
        // plain.py produced zero blocks but still counts as indexed
        assert_eq!(stats.files_indexed, 3);
        assert_eq!(stats.blocks_extracted, 3);
        assert_eq!(stats.blocks_indexed, 3);
    }

    #[tokio::test]
    async fn test_per_file_failure_isolation() {
        let dir = write_files(&[
            ("good.py", "def fine(): return 1\n"),
            ("bad.py", "def poison(): return 0\n"),
        ]);
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;

        let (stats, failed) = run_index(dir.path(), &store, &FailingEmbedder).await;

        assert_eq!(stats.files_indexed, 1);
        assert_eq!(stats.blocks_indexed, 1);
        assert_eq!(failed.len(), 1);
        assert!(failed[0].ends_with("bad.py"));
    }

    #[tokio::test]
    async fn test_idempotent_rebuild() {
        let dir = write_files(&[
            ("a.py", "def needle(): return 1\n"),
            ("b.py", "def other(): return 2\n"),
        ]);
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;

        let (first, _) = run_index(dir.path(), &store, &StubEmbedder).await;
        let (second, _) = run_index(dir.path(), &store, &StubEmbedder).await;

        assert_eq!(first, second);

        // Identical content at identical locations upserts in place
        let hits = store.query(&[1.0, 0.0, 0.0, 0.1], 10).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_stored_filenames_are_root_relative() {
        let dir = write_files(&[("src/util.py", "def helper(): return 1\n")]);
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;

        run_index(dir.path(), &store, &StubEmbedder).await;

        let hits = store.query(&[0.0, 1.0, 0.0, 0.1], 1).await.unwrap();
        assert_eq!(hits[0].filename, "src/util.py");
        assert_eq!(hits[0].language, "python");
    }

    #[tokio::test]
    async fn test_end_to_end_needle_search() {
        let dir = write_files(&[
            ("a.py", "def needle(): return 1\n"),
            ("b.py", "def other(): return 2\n"),
        ]);
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;
        let embedder = StubEmbedder;

        run_index(dir.path(), &store, &embedder).await;

        let query = embedder.embed_query("find the needle").await.unwrap();
        let hits = store.query(&query, 1).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].filename, "a.py");
        assert!(hits[0].code.contains("def needle"));
    }

    #[tokio::test]
    async fn test_ignored_files_not_indexed() {
        let dir = write_files(&[
            ("kept.py", "def kept(): return 1\n"),
            ("ignored.py", "def skipped(): return 2\n"),
        ]);
        fs::write(dir.path().join(".gitignore"), "ignored.py\n").unwrap();
        let store_dir = TempDir::new().unwrap();
        let store = open_store(&store_dir).await;

        let (stats, _) = run_index(dir.path(), &store, &StubEmbedder).await;
        assert_eq!(stats.files_indexed, 1);
    }

    #[test]
    fn test_relative_filename_normalization() {
        let root = Path::new("/project");
        assert_eq!(
            relative_filename(root, Path::new("/project/src/a.py")),
            "src/a.py"
        );
        assert_eq!(relative_filename(root, Path::new("/project/a.py")), "a.py");
    }
}
