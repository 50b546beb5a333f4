//! Structural block extraction using tree-sitter.
//!
//! Walks the syntax tree top-down and emits one block per definition node.
//! Descent stops at every emitted block, so the subtree of a class (or any
//! other definition) is never extracted separately and block line ranges
//! within a file stay disjoint.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::error::{GistError, Result};
use super::language::Language;
use super::models::Block;

/// Extracts definition blocks from supported source files.
pub struct BlockExtractor;

impl BlockExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all top-level definition blocks from `path`, in document order.
    ///
    /// Returns an empty list when the file contains no recognized
    /// constructs. Fails if the extension is unsupported or the file cannot
    /// be read.
    pub fn extract(&self, path: &Path) -> Result<Vec<Block>> {
        let language = Language::from_path(path)
            .ok_or_else(|| GistError::UnsupportedLanguage(path.to_path_buf()))?;

        let source = std::fs::read(path).map_err(|source| GistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.extract_source(&source, language, &path.display().to_string())
    }

    /// Extract blocks from raw source bytes already known to be `language`.
    pub fn extract_source(
        &self,
        source: &[u8],
        language: Language,
        filename: &str,
    ) -> Result<Vec<Block>> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|e| GistError::Parse(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            GistError::Parse(format!("failed to parse {} source", language.name()))
        })?;

        let mut blocks = Vec::new();
        visit_node(tree.root_node(), source, language, filename, &mut blocks);
        Ok(blocks)
    }
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn visit_node(node: Node, source: &[u8], language: Language, filename: &str, blocks: &mut Vec<Block>) {
    if language.is_definition(node.kind()) {
        blocks.push(Block {
            filename: filename.to_string(),
            start_line: node.start_position().row as u32 + 1,
            end_line: node.end_position().row as u32 + 1,
            code: node_text(node, source),
            parent_scope: resolve_parent_scope(node, source, language),
        });

        // Emitted subtrees are not descended into, keeping blocks disjoint.
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_node(child, source, language, filename, blocks);
    }
}

/// Walk ancestors to the nearest type definition and extract its name.
///
/// Grammars without a dedicated `name` field (C++) fall back to scanning the
/// node's direct children for an identifier token. Best-effort: returns None
/// rather than guessing.
fn resolve_parent_scope(node: Node, source: &[u8], language: Language) -> Option<String> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if language.is_type_definition(ancestor.kind()) {
            if let Some(name) = ancestor.child_by_field_name("name") {
                return Some(node_text(name, source));
            }

            if language == Language::Cpp {
                let mut cursor = ancestor.walk();
                for child in ancestor.children(&mut cursor) {
                    if matches!(child.kind(), "type_identifier" | "identifier") {
                        return Some(node_text(child, source));
                    }
                }
            }

            return None;
        }
        current = ancestor.parent();
    }
    None
}

/// Byte-exact span of a node, decoded with invalid sequences replaced.
fn node_text(node: Node, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.start_byte()..node.end_byte()]).into_owned()
}
