//! Stable block identity derivation.
//!
//! Identity is content-addressed: the same code at the same location always
//! produces the same block id, so re-indexing unchanged files is an
//! idempotent upsert.

use sha2::{Digest, Sha256};

/// Hash the exact source text of a block (whitespace-sensitive).
pub fn content_hash(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Derive the storage primary key from location plus content hash.
pub fn block_id(filename: &str, start_line: u32, end_line: u32, content_hash: &str) -> String {
    let stable = format!("{filename}:{start_line}:{end_line}:{content_hash}");
    hex::encode(Sha256::digest(stable.as_bytes()))
}
