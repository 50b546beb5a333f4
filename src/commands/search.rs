//! Search command - semantic search over indexed code blocks.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::config::GistConfig;
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::store::{self, VectorStore};

#[derive(Args)]
pub struct SearchCmd {
    /// Natural language query
    pub query: String,

    /// Root directory that was indexed
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Max results
    #[arg(short, long, default_value = "3")]
    pub limit: usize,
}

impl SearchCmd {
    pub async fn run(&self) -> Result<()> {
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("cannot resolve root directory {}", self.root.display()))?;

        let store_dir = store::store_dir(&root);
        if !store_dir.exists() {
            bail!("No index found. Run `gist index` first.");
        }

        let config = GistConfig::load()?;
        let embedder = OpenAiEmbedder::new(&config);
        let store = VectorStore::open(&store_dir, embedder.dimension()).await?;

        let query_embedding = embedder.embed_query(&self.query).await?;
        let hits = store.query(&query_embedding, self.limit).await?;

        for hit in hits {
            let mut header = format!("=== {}:{}-{}", hit.filename, hit.start_line, hit.end_line);
            if let Some(parent) = &hit.parent_scope {
                header.push_str(&format!(" parent={parent}"));
            }
            header.push_str(" ===");

            println!("{header}");
            println!("{}", hit.code.trim_end_matches('\n'));
            println!();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_search_without_index_fails_fast() {
        let dir = TempDir::new().unwrap();
        let cmd = SearchCmd {
            query: "parse config".to_string(),
            root: dir.path().to_path_buf(),
            limit: 3,
        };

        let err = cmd.run().await.unwrap_err();
        assert!(err.to_string().contains("No index found"));
    }
}
