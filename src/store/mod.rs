//! LanceDB vector storage for indexed code blocks.
//!
//! One table holds every block with its full metadata and embedding.
//! Upserts are keyed by `block_id`, so re-indexing identical content at the
//! identical location overwrites in place.

#![allow(dead_code)]

mod models;

pub use models::{SearchHit, StoredBlock};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator,
    StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table};

use crate::index::error::{GistError, Result};

const TABLE_NAME: &str = "blocks";

/// The `.gist` directory under a project root.
pub fn gist_dir(root: &Path) -> PathBuf {
    root.join(".gist")
}

/// The persisted store directory under a project root.
pub fn store_dir(root: &Path) -> PathBuf {
    gist_dir(root).join("lancedb")
}

/// LanceDB-based vector store.
pub struct VectorStore {
    db: Connection,
    dim: i32,
}

impl VectorStore {
    /// Open or create a vector store at `path` for `dimension`-sized vectors.
    pub async fn open(path: &Path, dimension: usize) -> Result<Self> {
        std::fs::create_dir_all(path).map_err(|source| GistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let uri = path
            .to_str()
            .ok_or_else(|| GistError::Store(anyhow!("non-UTF-8 store path: {}", path.display())))?;

        let db = lancedb::connect(uri)
            .execute()
            .await
            .map_err(|e| store_err(e, "failed to connect to LanceDB"))?;

        Ok(Self {
            db,
            dim: dimension as i32,
        })
    }

    /// Write blocks and their embeddings, overwriting rows with the same
    /// `block_id`.
    pub async fn upsert_blocks(
        &self,
        blocks: &[StoredBlock],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if blocks.len() != embeddings.len() {
            return Err(GistError::Contract(format!(
                "blocks and embeddings length mismatch: {} vs {}",
                blocks.len(),
                embeddings.len()
            )));
        }
        if blocks.is_empty() {
            return Ok(());
        }
        for embedding in embeddings {
            if embedding.len() != self.dim as usize {
                return Err(GistError::Contract(format!(
                    "embedding dimension mismatch: expected {}, got {}",
                    self.dim,
                    embedding.len()
                )));
            }
        }

        let table = self.get_or_create_table().await?;
        let batch = self.records_to_batch(blocks, embeddings)?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], self.schema());

        let mut merge = table.merge_insert(&["block_id"]);
        merge
            .when_matched_update_all(None)
            .when_not_matched_insert_all();
        merge
            .execute(Box::new(batches))
            .await
            .map_err(|e| store_err(e, "failed to upsert blocks"))?;

        Ok(())
    }

    /// Return the `top_k` nearest stored blocks by cosine distance,
    /// nearest first. Fewer hits are returned when fewer blocks are stored.
    pub async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(GistError::Contract("top_k must be > 0".to_string()));
        }

        let table = match self.db.open_table(TABLE_NAME).execute().await {
            Ok(t) => t,
            Err(_) => return Ok(vec![]),
        };

        let results = table
            .query()
            .nearest_to(embedding)
            .map_err(|e| store_err(e, "invalid query vector"))?
            .distance_type(DistanceType::Cosine)
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| store_err(e, "failed to execute search"))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| store_err(e, "failed to collect results"))?;

        let mut hits = Vec::new();
        for batch in results {
            hits.extend(batch_to_hits(&batch)?);
        }

        sort_nearest_first(&mut hits);
        hits.truncate(top_k);

        Ok(hits)
    }

    async fn get_or_create_table(&self) -> Result<Table> {
        if let Ok(table) = self.db.open_table(TABLE_NAME).execute().await {
            return Ok(table);
        }

        let schema = self.schema();
        let empty_batch = self.empty_batch(&schema)?;
        let batches = RecordBatchIterator::new(vec![Ok(empty_batch)], schema);

        self.db
            .create_table(TABLE_NAME, Box::new(batches))
            .execute()
            .await
            .map_err(|e| store_err(e, "failed to create blocks table"))
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("block_id", DataType::Utf8, false),
            Field::new("filename", DataType::Utf8, false),
            Field::new("start_line", DataType::Int64, false),
            Field::new("end_line", DataType::Int64, false),
            Field::new("parent_scope", DataType::Utf8, true),
            Field::new("language", DataType::Utf8, false),
            Field::new("content_hash", DataType::Utf8, false),
            Field::new("code", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.dim,
                ),
                false,
            ),
        ]))
    }

    fn empty_batch(&self, schema: &Arc<Schema>) -> Result<RecordBatch> {
        let vectors = FixedSizeListArray::new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            self.dim,
            Arc::new(Float32Array::from(Vec::<f32>::new())),
            None,
        );

        RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(Vec::<String>::new())),
                Arc::new(StringArray::from(Vec::<String>::new())),
                Arc::new(Int64Array::from(Vec::<i64>::new())),
                Arc::new(Int64Array::from(Vec::<i64>::new())),
                Arc::new(StringArray::from(Vec::<Option<String>>::new())),
                Arc::new(StringArray::from(Vec::<String>::new())),
                Arc::new(StringArray::from(Vec::<String>::new())),
                Arc::new(StringArray::from(Vec::<String>::new())),
                Arc::new(vectors),
            ],
        )
        .map_err(|e| store_err(e, "failed to create empty batch"))
    }

    fn records_to_batch(
        &self,
        blocks: &[StoredBlock],
        embeddings: &[Vec<f32>],
    ) -> Result<RecordBatch> {
        let block_ids: Vec<&str> = blocks.iter().map(|b| b.block_id.as_str()).collect();
        let filenames: Vec<&str> = blocks.iter().map(|b| b.filename.as_str()).collect();
        let start_lines: Vec<i64> = blocks.iter().map(|b| i64::from(b.start_line)).collect();
        let end_lines: Vec<i64> = blocks.iter().map(|b| i64::from(b.end_line)).collect();
        let parent_scopes: Vec<Option<&str>> =
            blocks.iter().map(|b| b.parent_scope.as_deref()).collect();
        let languages: Vec<&str> = blocks.iter().map(|b| b.language.as_str()).collect();
        let content_hashes: Vec<&str> = blocks.iter().map(|b| b.content_hash.as_str()).collect();
        let codes: Vec<&str> = blocks.iter().map(|b| b.code.as_str()).collect();
        let flat_vectors: Vec<f32> = embeddings.iter().flatten().copied().collect();

        let vector_array = FixedSizeListArray::new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            self.dim,
            Arc::new(Float32Array::from(flat_vectors)),
            None,
        );

        RecordBatch::try_new(
            self.schema(),
            vec![
                Arc::new(StringArray::from(block_ids)),
                Arc::new(StringArray::from(filenames)),
                Arc::new(Int64Array::from(start_lines)),
                Arc::new(Int64Array::from(end_lines)),
                Arc::new(StringArray::from(parent_scopes)),
                Arc::new(StringArray::from(languages)),
                Arc::new(StringArray::from(content_hashes)),
                Arc::new(StringArray::from(codes)),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| store_err(e, "failed to create record batch"))
    }
}

/// Nearest first. Hits without a reported distance rank last so they can
/// never evict a ranked hit at truncation.
fn sort_nearest_first(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn batch_to_hits(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
    let block_ids = string_column(batch, "block_id")?;
    let filenames = string_column(batch, "filename")?;
    let start_lines = int_column(batch, "start_line")?;
    let end_lines = int_column(batch, "end_line")?;
    let parent_scopes = string_column(batch, "parent_scope")?;
    let languages = string_column(batch, "language")?;
    let content_hashes = string_column(batch, "content_hash")?;
    let codes = string_column(batch, "code")?;

    // The engine appends `_distance` to ranked results; tolerate its absence.
    let distances = batch
        .column_by_name("_distance")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

    let mut hits = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let parent_scope = if parent_scopes.is_null(i) {
            None
        } else {
            Some(parent_scopes.value(i).to_string())
        };
        let distance = distances.and_then(|d| {
            if d.is_null(i) {
                None
            } else {
                Some(d.value(i))
            }
        });

        hits.push(SearchHit {
            block_id: block_ids.value(i).to_string(),
            filename: filenames.value(i).to_string(),
            start_line: start_lines.value(i) as u32,
            end_line: end_lines.value(i) as u32,
            parent_scope,
            language: languages.value(i).to_string(),
            content_hash: content_hashes.value(i).to_string(),
            code: codes.value(i).to_string(),
            distance,
        });
    }

    Ok(hits)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| GistError::Store(anyhow!("missing or invalid column '{name}'")))
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| GistError::Store(anyhow!("missing or invalid column '{name}'")))
}

fn store_err(e: impl std::error::Error + Send + Sync + 'static, msg: &'static str) -> GistError {
    GistError::Store(anyhow::Error::new(e).context(msg))
}
