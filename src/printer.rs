//! @ai:module:intent Turn a mutated syntax tree back into Go source text
//! @ai:module:layer application
//! @ai:module:public_api render, print
//! @ai:module:depends_on syntax, format, error
//! @ai:module:stateless true
//!
//! Rendering splices the tree's edits into the text it was parsed from, so
//! everything the tree does not model is reproduced byte for byte. The
//! formatter then canonicalises layout and the result is re-parsed to make
//! sure it is still valid Go.

use crate::error::{Error, Result};
use crate::format::Formatter;
use crate::syntax::{self, CommentGroup, Documented, Node, SourceFile, Span};
use std::collections::HashSet;
use std::path::PathBuf;

/// @ai:intent A replacement of a byte range of the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) span: Span,
    pub(crate) replacement: String,
}

impl Edit {
    pub(crate) fn replace(span: Span, replacement: String) -> Self {
        Self { span, replacement }
    }

    pub(crate) fn delete(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            replacement: String::new(),
        }
    }
}

/// @ai:intent Render a tree to text by applying its removals to the original source
/// @ai:post comment groups dropped from the file table or cleared from a doc slot are gone
/// @ai:post cleared tags are gone; rewritten tags carry their new content
/// @ai:effects pure
pub fn render(file: &SourceFile) -> String {
    let source = file.source();
    let mut edits = Vec::new();

    for group in removed_comment_groups(file) {
        for comment in &group.comments {
            edits.push(comment_removal(source, comment.span));
        }
    }

    file.walk(|node| {
        if let Node::Field(field) = node {
            let Some(origin) = field.tag.origin() else {
                return;
            };
            match field.tag.get() {
                None => {
                    let start = source[..origin.start].trim_end_matches([' ', '\t']).len();
                    edits.push(Edit::delete(start, origin.end));
                }
                Some(tag) => {
                    let literal = tag.literal();
                    if literal != source[origin.start..origin.end] {
                        edits.push(Edit::replace(origin, literal));
                    }
                }
            }
        }
    });

    apply(source, edits)
}

/// @ai:intent Render, canonicalise and validate a tree
/// @ai:post Ok text parses as Go
/// @ai:effects pure
pub fn print(file: &SourceFile, formatter: &dyn Formatter) -> Result<String> {
    let rendered = render(file);
    let formatted = formatter.format(&rendered).map_err(|e| Error::Print {
        file: PathBuf::new(),
        message: format!("{} formatter failed: {}", formatter.name(), e),
    })?;

    syntax::parse(&formatted).map_err(|e| Error::Print {
        file: PathBuf::new(),
        message: format!("output is not valid Go: {}", e),
    })?;

    Ok(formatted)
}

/// @ai:intent Original comment groups that must not appear in the output
///
/// A group is dropped when the mutator removed it from the file-level table
/// or cleared it from the doc slot of a node it documented.
/// @ai:effects pure
fn removed_comment_groups(file: &SourceFile) -> Vec<&CommentGroup> {
    let retained: HashSet<Span> = file.comments.iter().map(CommentGroup::span).collect();
    let mut cleared: HashSet<Span> = HashSet::new();

    file.walk(|node| {
        if let Some(slot) = node.as_documented().map(Documented::doc_slot) {
            if slot.was_cleared() {
                cleared.extend(slot.origin());
            }
        }
    });

    file.original_comments()
        .iter()
        .filter(|group| {
            let span = group.span();
            !retained.contains(&span) || cleared.contains(&span)
        })
        .collect()
}

/// @ai:intent Choose how much surrounding whitespace goes with a removed comment
/// @ai:effects pure
fn comment_removal(source: &str, comment: Span) -> Edit {
    let line_start = source[..comment.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[comment.end..]
        .find('\n')
        .map_or(source.len(), |i| comment.end + i);

    let before = &source[line_start..comment.start];
    let after = &source[comment.end..line_end];

    if before.trim().is_empty() && after.trim().is_empty() {
        // alone on its line(s): drop the whole line
        let end = if line_end < source.len() {
            line_end + 1
        } else {
            line_end
        };
        Edit::delete(line_start, end)
    } else if after.trim().is_empty() {
        let start = comment.start - (before.len() - before.trim_end().len());
        Edit::delete(start, line_end)
    } else {
        // Code follows on the same line. A block comment separates tokens like
        // a space, or like a newline when it spans lines, so the neighbours
        // must not be joined.
        let end = comment.end + (after.len() - after.trim_start().len());
        let separator = if source[comment.start..comment.end].contains('\n') {
            "\n"
        } else if before.ends_with(|c: char| !c.is_whitespace()) {
            " "
        } else {
            ""
        };
        Edit::replace(Span::new(comment.start, end), separator.to_string())
    }
}

/// @ai:intent Apply non-overlapping edits in one pass
/// @ai:pre edits reference byte ranges of source
/// @ai:edge_cases an edit overlapping an earlier one is merged into it
/// @ai:effects pure
pub(crate) fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.span.start, e.span.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for edit in edits {
        if edit.span.start < cursor {
            if edit.replacement.is_empty() && edit.span.end > cursor {
                cursor = edit.span.end;
            }
            continue;
        }
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }

    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::mutator::strip;
    use crate::syntax::parse;
    use pretty_assertions::assert_eq;

    fn strip_and_render(src: &str) -> String {
        let mut file = parse(src).unwrap();
        strip(&mut file, &Matcher::default());
        render(&file)
    }

    #[test]
    fn test_render_unchanged_tree_is_identity() {
        let src = "package p\n\n// Doc.\ntype T struct {\n\tA int `yaml:\"a\"`\n}\n";
        let file = parse(src).unwrap();
        assert_eq!(render(&file), src);
    }

    #[test]
    fn test_removes_own_line_comments() {
        let src = "package p\n\n// +kubebuilder:object:root=true\n// +kubebuilder:subresource:status\n\n// T is a type.\ntype T struct{}\n";
        assert_eq!(
            strip_and_render(src),
            "package p\n\n\n// T is a type.\ntype T struct{}\n"
        );
    }

    #[test]
    fn test_removes_trailing_comment_and_tag() {
        let src = "package p\n\ntype T struct {\n\tA int `json:\"a\"` // +kubebuilder:default=1\n}\n";
        assert_eq!(
            strip_and_render(src),
            "package p\n\ntype T struct {\n\tA int\n}\n"
        );
    }

    #[test]
    fn test_removes_leading_block_comment() {
        let src = "package p\n\n/* +kubebuilder:skip */ type T int\n";
        assert_eq!(strip_and_render(src), "package p\n\ntype T int\n");
    }

    #[test]
    fn test_multiline_block_comment() {
        let src = "package p\n\n/*\n+kubebuilder:skip\n*/\ntype T int\n";
        assert_eq!(strip_and_render(src), "package p\n\ntype T int\n");
    }

    #[test]
    fn test_rewrites_tag_in_place() {
        let src = "package p\n\ntype T struct {\n\tName string `json:\"name\" yaml:\"name\"`\n}\n";
        assert_eq!(
            strip_and_render(src),
            "package p\n\ntype T struct {\n\tName string `yaml:\"name\"`\n}\n"
        );
    }

    #[test]
    fn test_comment_inside_function_body() {
        let src = "package p\n\nfunc f() {\n\t// +kubebuilder:rbac:groups=apps\n\tx := 1\n\t_ = x\n}\n";
        assert_eq!(
            strip_and_render(src),
            "package p\n\nfunc f() {\n\tx := 1\n\t_ = x\n}\n"
        );
    }

    #[test]
    fn test_inline_comment_between_tokens_leaves_space() {
        let src = "package p\n\nvar x/* +kubebuilder */int = 1\n";
        assert_eq!(strip_and_render(src), "package p\n\nvar x int = 1\n");
    }

    #[test]
    fn test_inline_comment_after_return_leaves_space() {
        let src = "package p\n\nfunc f() int {\n\treturn/* +kubebuilder */1\n}\n";
        assert_eq!(
            strip_and_render(src),
            "package p\n\nfunc f() int {\n\treturn 1\n}\n"
        );
    }

    #[test]
    fn test_inline_comment_with_space_before_is_not_doubled() {
        let src = "package p\n\nvar x /* +kubebuilder */ int = 1\n";
        assert_eq!(strip_and_render(src), "package p\n\nvar x int = 1\n");
    }

    #[test]
    fn test_print_keeps_tokens_apart() {
        let mut file = parse("package p\n\nvar x/* +kubebuilder */int = 1\n").unwrap();
        strip(&mut file, &Matcher::default());
        assert_eq!(
            print(&file, &crate::format::Builtin).unwrap(),
            "package p\n\nvar x int = 1\n"
        );
    }

    #[test]
    fn test_apply_merges_overlaps() {
        let edits = vec![Edit::delete(2, 6), Edit::delete(4, 8)];
        assert_eq!(apply("0123456789", edits), "0189");
    }
}
