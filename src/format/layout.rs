//! @ai:module:intent Builtin canonical layout: struct field columns and blank-line normalisation
//! @ai:module:layer infrastructure
//! @ai:module:public_api Builtin
//! @ai:module:depends_on format::align, syntax::parse, printer
//! @ai:module:stateless true

use super::align::align;
use super::Formatter;
use crate::error::Result;
use crate::language::COMMENT_STYLE;
use crate::printer::{apply, Edit};
use crate::syntax::parse::parse_tree;
use crate::syntax::Span;
use std::collections::HashSet;
use tree_sitter::Node as TsNode;

/// @ai:intent Formatter that needs no Go toolchain
///
/// Covers the layout that stripping can disturb: struct field columns (names,
/// types, tags and trailing comments are realigned the way gofmt's tabwriter
/// does it), trailing whitespace, runs of blank lines, and the file's final
/// newline. Other constructs keep the layout they already have.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl Formatter for Builtin {
    fn name(&self) -> &str {
        "builtin"
    }

    fn format(&self, source: &str) -> Result<String> {
        let normalized = normalize_lines(source)?;
        align_fields(&normalized)
    }
}

/// @ai:intent Strip trailing whitespace and collapse blank lines outside literals and block comments
/// @ai:post no leading blank lines, no run of more than one blank line, exactly one final newline
/// @ai:effects pure
fn normalize_lines(source: &str) -> Result<String> {
    let tree = parse_tree(source)?;
    let verbatim = verbatim_rows(tree.root_node(), source);

    let mut out: Vec<&str> = Vec::new();
    let mut pending_blank = false;

    for (row, line) in source.split('\n').enumerate() {
        let line = if verbatim.contains(&row) {
            line
        } else {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                pending_blank = true;
                continue;
            }
            trimmed
        };

        if pending_blank && !out.is_empty() {
            out.push("");
        }
        pending_blank = false;
        out.push(line);
    }

    if out.is_empty() {
        return Ok(String::new());
    }
    let mut text = out.join("\n");
    text.push('\n');
    Ok(text)
}

/// Rows covered by multi-line raw strings and block comments.
fn verbatim_rows(root: TsNode, source: &str) -> HashSet<usize> {
    let mut rows = HashSet::new();
    for node in descendants(root) {
        let start = node.start_position().row;
        let end = node.end_position().row;
        if start == end {
            continue;
        }
        let multi_line_literal = node.kind() == "raw_string_literal";
        let block_comment =
            node.kind() == "comment" && COMMENT_STYLE.is_block_comment(&source[node.byte_range()]);
        if multi_line_literal || block_comment {
            rows.extend(start..=end);
        }
    }
    rows
}

fn descendants(root: TsNode) -> Vec<TsNode> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    out
}

/// One struct field line ready for alignment.
#[derive(Debug)]
struct FieldLine {
    span: Span,
    cells: Vec<String>,
}

/// @ai:intent Realign the columns of every struct field list
/// @ai:effects pure
fn align_fields(source: &str) -> Result<String> {
    let tree = parse_tree(source)?;
    let mut edits = Vec::new();

    for list in descendants(tree.root_node())
        .into_iter()
        .filter(|n| n.kind() == "field_declaration_list")
    {
        let Some(sections) = field_sections(list, source) else {
            tracing::trace!(row = list.start_position().row + 1, "leaving field list layout as is");
            continue;
        };
        for section in sections {
            let rows: Vec<Vec<String>> = section.iter().map(|l| l.cells.clone()).collect();
            for (line, aligned) in section.iter().zip(align(&rows)) {
                if source[line.span.start..line.span.end] != aligned {
                    edits.push(Edit::replace(line.span, aligned));
                }
            }
        }
    }

    Ok(apply(source, edits))
}

/// @ai:intent Split a field list into alignment sections
///
/// A section ends at a blank line, at a comment on its own line, and after a
/// field spanning several lines. Lists with layouts this does not model (two
/// fields on one line, comments inside a field) yield None.
/// @ai:effects pure
fn field_sections(list: TsNode, source: &str) -> Option<Vec<Vec<FieldLine>>> {
    let mut cursor = list.walk();
    let children: Vec<TsNode> = list.named_children(&mut cursor).collect();

    let mut sections = Vec::new();
    let mut current = Vec::new();
    let mut prev_end_row = list.start_position().row;
    let mut prev_multi_line = false;
    let mut i = 0;

    while i < children.len() {
        let child = children[i];
        let row = child.start_position().row;
        if row <= prev_end_row {
            return None;
        }

        match child.kind() {
            "comment" => {
                flush(&mut current, &mut sections);
                prev_end_row = child.end_position().row;
                prev_multi_line = false;
                i += 1;
            }
            "field_declaration" => {
                if row > prev_end_row + 1 || prev_multi_line {
                    flush(&mut current, &mut sections);
                }

                let end_row = child.end_position().row;
                let trailing = children
                    .get(i + 1)
                    .copied()
                    .filter(|next| next.kind() == "comment" && next.start_position().row == end_row);
                if trailing.is_some()
                    && children
                        .get(i + 2)
                        .is_some_and(|after| after.start_position().row == end_row)
                {
                    return None;
                }

                current.push(field_line(child, trailing, source)?);
                prev_end_row = trailing.map_or(end_row, |c| c.end_position().row);
                prev_multi_line = row != end_row;
                i += if trailing.is_some() { 2 } else { 1 };
            }
            _ => return None,
        }
    }

    flush(&mut current, &mut sections);
    Some(sections)
}

fn flush(current: &mut Vec<FieldLine>, sections: &mut Vec<Vec<FieldLine>>) {
    if !current.is_empty() {
        sections.push(std::mem::take(current));
    }
}

/// @ai:intent Cells of a field's first line: names, type, tag and trailing comment
///
/// Embedded fields put their type in the names column. A tag follows it
/// directly; a lone trailing comment skips the empty type column.
/// @ai:effects pure
fn field_line(field: TsNode, trailing: Option<TsNode>, source: &str) -> Option<FieldLine> {
    let start = field.start_byte();
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if !source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }
    if descendants(field).iter().any(|n| n.kind() == "comment") {
        return None;
    }

    let text = |node: TsNode| &source[node.byte_range()];
    let mut cursor = field.walk();
    let names: Vec<&str> = field
        .children_by_field_name("name", &mut cursor)
        .map(text)
        .collect();
    let ty = field.child_by_field_name("type")?;
    let tag = field.child_by_field_name("tag");

    if field.start_position().row != field.end_position().row {
        // Only the first line joins the section; the rest belongs to the type.
        if ty.start_position().row != field.start_position().row {
            return None;
        }
        let line_end = source[start..].find('\n').map(|i| start + i)?;
        let head_end = start + source[start..line_end].trim_end().len();
        let cells = if names.is_empty() {
            vec![source[start..head_end].to_string()]
        } else {
            vec![names.join(", "), source[ty.start_byte()..head_end].to_string()]
        };
        return Some(FieldLine {
            span: Span::new(start, head_end),
            cells,
        });
    }

    let mut cells = Vec::new();
    if names.is_empty() {
        cells.push(source[start..ty.end_byte()].to_string());
        if tag.is_none() && trailing.is_some() {
            cells.push(String::new());
        }
    } else {
        cells.push(names.join(", "));
        cells.push(text(ty).to_string());
    }
    if let Some(tag) = tag {
        cells.push(text(tag).to_string());
    }

    let mut end = field.end_byte();
    if let Some(comment) = trailing {
        if comment.start_position().row != comment.end_position().row {
            return None;
        }
        cells.push(text(comment).to_string());
        end = comment.end_byte();
    }

    Some(FieldLine {
        span: Span::new(start, end),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn format(src: &str) -> String {
        Builtin.format(src).unwrap()
    }

    #[test]
    fn test_blank_lines_collapse() {
        let src = "\n\npackage p\n\n\n\nvar x = 1   \n\n";
        assert_eq!(format(src), "package p\n\nvar x = 1\n");
    }

    #[test]
    fn test_raw_string_untouched() {
        let src = "package p\n\nvar s = `a   \n\n\n b`\n";
        assert_eq!(format(src), src);
    }

    #[test]
    fn test_realigns_after_tag_removal() {
        let src = "package p\n\ntype T struct {\n\tName     string\n\tReplicas int32  `yaml:\"replicas\"`\n}\n";
        assert_eq!(
            format(src),
            "package p\n\ntype T struct {\n\tName     string\n\tReplicas int32 `yaml:\"replicas\"`\n}\n"
        );
    }

    #[test]
    fn test_sections_merge_when_comment_removed() {
        let src = "package p\n\ntype T struct {\n\tA string `yaml:\"a\"`\n\tLonger int `yaml:\"longer\"`\n}\n";
        assert_eq!(
            format(src),
            "package p\n\ntype T struct {\n\tA      string `yaml:\"a\"`\n\tLonger int    `yaml:\"longer\"`\n}\n"
        );
    }

    #[test]
    fn test_comment_lines_break_sections() {
        let src = "package p\n\ntype T struct {\n\tA int\n\t// Doc.\n\tLonger int\n}\n";
        assert_eq!(format(src), src);
    }

    #[test]
    fn test_trailing_comments_align() {
        let src = "package p\n\ntype T struct {\n\tA int // a\n\tLonger string // longer\n}\n";
        assert_eq!(
            format(src),
            "package p\n\ntype T struct {\n\tA      int    // a\n\tLonger string // longer\n}\n"
        );
    }

    #[test]
    fn test_multi_line_field_head_joins_section() {
        let src = "package p\n\ntype T struct {\n\tA int\n\tSpec struct {\n\t\tX int\n\t}\n\tB int\n}\n";
        assert_eq!(
            format(src),
            "package p\n\ntype T struct {\n\tA    int\n\tSpec struct {\n\t\tX int\n\t}\n\tB int\n}\n"
        );
    }

    #[test]
    fn test_embedded_field_tag_column() {
        let src = "package p\n\ntype T struct {\n\tmetav1.TypeMeta `yaml:\",inline\"`\n\tName string `yaml:\"name\"`\n}\n";
        assert_eq!(
            format(src),
            "package p\n\ntype T struct {\n\tmetav1.TypeMeta `yaml:\",inline\"`\n\tName            string `yaml:\"name\"`\n}\n"
        );
    }

    #[test]
    fn test_single_line_struct_untouched() {
        let src = "package p\n\ntype T struct{ A int }\n";
        assert_eq!(format(src), src);
    }
}
