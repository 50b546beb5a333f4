use std::path::Path;

/// Supported languages for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Cpp,
}

impl Language {
    /// Detect language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "cpp" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Detect language from file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Name of the language, as persisted with each block.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Cpp => "cpp",
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Grammar node kinds that become extracted blocks.
    pub fn definition_kinds(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["function_definition", "class_definition"],
            Language::JavaScript | Language::TypeScript => &[
                "function_declaration",
                "class_declaration",
                "method_definition",
            ],
            Language::Cpp => &["function_definition", "class_specifier", "struct_specifier"],
        }
    }

    /// Grammar node kinds that define an enclosing type scope.
    pub fn type_definition_kinds(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["class_definition"],
            Language::JavaScript | Language::TypeScript => &["class_declaration"],
            Language::Cpp => &["class_specifier", "struct_specifier"],
        }
    }

    pub fn is_definition(&self, kind: &str) -> bool {
        self.definition_kinds().contains(&kind)
    }

    pub fn is_type_definition(&self, kind: &str) -> bool {
        self.type_definition_kinds().contains(&kind)
    }
}
