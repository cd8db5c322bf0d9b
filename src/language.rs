//! @ai:module:intent Describe the Go source language: file suffix, comment syntax, grammar
//! @ai:module:layer domain
//! @ai:module:public_api is_source_file, grammar, CommentStyle
//! @ai:module:stateless true

use std::path::Path;

/// File suffix identifying Go source files.
pub const SOURCE_EXTENSION: &str = "go";

/// @ai:intent Comment syntax of the target language
#[derive(Debug, Clone, Copy)]
pub struct CommentStyle {
    pub block_start: &'static str,
    pub block_end: &'static str,
}

/// Go comment syntax.
pub const COMMENT_STYLE: CommentStyle = CommentStyle {
    block_start: "/*",
    block_end: "*/",
};

impl CommentStyle {
    /// @ai:intent Check whether comment text is a complete block comment
    /// @ai:effects pure
    pub fn is_block_comment(&self, text: &str) -> bool {
        text.len() >= self.block_start.len() + self.block_end.len()
            && text.starts_with(self.block_start)
            && text.ends_with(self.block_end)
    }
}

/// @ai:intent Tree-sitter grammar used by the parse service
/// @ai:effects pure
pub fn grammar() -> tree_sitter::Language {
    tree_sitter_go::language()
}

/// @ai:intent Check if a file should be processed based on its suffix
/// @ai:example ("types.go") -> true
/// @ai:example ("types.go.orig") -> false
/// @ai:example ("README.md") -> false
/// @ai:effects pure
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_go() {
        assert!(is_source_file(Path::new("api/v1/types.go")));
    }

    #[test]
    fn test_unsupported() {
        assert!(!is_source_file(Path::new("test.rs")));
        assert!(!is_source_file(Path::new("types.go.orig")));
        assert!(!is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_comment_style() {
        assert!(COMMENT_STYLE.is_block_comment("/* block */"));
        assert!(!COMMENT_STYLE.is_block_comment("// +kubebuilder:object:root=true"));
        assert!(COMMENT_STYLE.is_block_comment("/*\n+kubebuilder:skip\n*/"));
        assert!(!COMMENT_STYLE.is_block_comment("/*/"));
    }
}
