//! Index command - (re)build the vector index for a directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::GistConfig;
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::index::{IndexingPipeline, PathFilter};
use crate::store::{self, VectorStore};

#[derive(Args)]
pub struct IndexCmd {
    /// Root directory to index
    #[arg(default_value = ".")]
    pub root: PathBuf,
}

impl IndexCmd {
    pub async fn run(&self) -> Result<()> {
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("cannot resolve root directory {}", self.root.display()))?;

        // Always wipe and rebuild; there is no partial update path.
        let store_dir = store::store_dir(&root);
        if store_dir.exists() {
            std::fs::remove_dir_all(&store_dir).context("failed to remove existing index")?;
        }

        let config = GistConfig::load()?;
        let embedder = OpenAiEmbedder::new(&config);
        let store = VectorStore::open(&store_dir, embedder.dimension()).await?;
        let filter = PathFilter::from_root(&root)?;

        let pipeline = IndexingPipeline::new(filter, &store, &embedder);
        let stats = pipeline
            .index(&root, &mut |path, err| {
                eprintln!("[error] {}: {err}", path.display());
            })
            .await?;

        println!(
            "Indexed {} file(s), {} block(s) ({} extracted).",
            stats.files_indexed, stats.blocks_indexed, stats.blocks_extracted
        );

        Ok(())
    }
}
