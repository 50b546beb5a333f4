//! Data models for extraction and indexing.

/// A contiguous block of source code extracted from a file.
///
/// Line numbers are 1-indexed and inclusive. Blocks extracted from the
/// same file never have overlapping line ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
    pub code: String,
    /// Name of the nearest enclosing type definition, if any.
    pub parent_scope: Option<String>,
}

/// Aggregate counts for one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Files that were language-supported and processed without error.
    pub files_indexed: usize,
    pub blocks_extracted: usize,
    pub blocks_indexed: usize,
}
