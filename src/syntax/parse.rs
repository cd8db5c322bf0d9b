//! @ai:module:intent Parse Go source text into a SourceFile with comment groups and doc attachments
//! @ai:module:layer infrastructure
//! @ai:module:public_api parse
//! @ai:module:depends_on language, syntax, error
//! @ai:module:stateless true

use super::{
    Comment, CommentGroup, Field, FuncDecl, GenDecl, InterfaceType, Node,
    SourceFile, Slot, Span, StructType, Tag, TypeSpec, ValueSpec,
};
use crate::error::{Error, Result};
use crate::language::grammar;
use std::collections::HashMap;
use std::path::PathBuf;
use tree_sitter::{Node as TsNode, Parser, Tree};

const COMMENT: &str = "comment";

/// @ai:intent Parse Go source into a syntax tree preserving every comment
/// @ai:pre source is the full text of one file
/// @ai:post Ok tree has one CommentGroup per Go comment group, in source order
/// @ai:post Err(Parse) names the first malformed position (1-based line and column)
/// @ai:effects pure
pub fn parse(source: &str) -> Result<SourceFile> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();

    let leaves = leaves(root);
    let (groups, leads) = group_comments(&leaves, source);

    let builder = Builder {
        source,
        groups: &groups,
        leads,
    };
    let decls = builder.top_level(root);

    Ok(SourceFile::new(source.to_string(), groups, decls))
}

/// @ai:intent Run the tree-sitter Go grammar over source, rejecting trees with errors
/// @ai:effects pure
pub(crate) fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar())
        .map_err(|e| parse_error(0, 0, format!("failed to load Go grammar: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| parse_error(0, 0, "parser produced no tree".to_string()))?;

    if tree.root_node().has_error() {
        return Err(describe_error(tree.root_node(), source));
    }

    Ok(tree)
}

fn parse_error(line: usize, column: usize, message: String) -> Error {
    Error::Parse {
        file: PathBuf::new(),
        line,
        column,
        message,
    }
}

/// @ai:intent Build a parse error for the first ERROR or MISSING node
/// @ai:effects pure
fn describe_error(root: TsNode, source: &str) -> Error {
    let Some(node) = find_error(root) else {
        return parse_error(1, 1, "syntax error".to_string());
    };

    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = source[node.byte_range()]
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(32)
            .collect();
        if snippet.is_empty() {
            "syntax error".to_string()
        } else {
            format!("unexpected `{}`", snippet)
        }
    };

    parse_error(position.row + 1, position.column + 1, message)
}

fn find_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children.into_iter().find_map(find_error)
}

/// @ai:intent Collect every token (leaf node) in document order, comments included
/// @ai:effects pure
fn leaves(root: TsNode) -> Vec<TsNode> {
    let mut out = Vec::new();
    let mut cursor = root.walk();

    'walk: loop {
        let node = cursor.node();
        if node.child_count() == 0 {
            if node.end_byte() > node.start_byte() {
                out.push(node);
            }
        } else if cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    out
}

/// @ai:intent Group comments the way the Go parser does and find each token's lead comment
/// @ai:post leads maps a token's start byte to the index of the group directly above it
/// @ai:effects pure
fn group_comments(leaves: &[TsNode], source: &str) -> (Vec<CommentGroup>, HashMap<usize, usize>) {
    let mut groups: Vec<CommentGroup> = Vec::new();
    let mut leads = HashMap::new();
    let mut prev_token_row: Option<usize> = None;
    let mut i = 0;

    while i < leaves.len() {
        if leaves[i].kind() != COMMENT {
            prev_token_row = Some(leaves[i].start_position().row);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < leaves.len() && leaves[i].kind() == COMMENT {
            i += 1;
        }
        let run = &leaves[run_start..i];
        let mut j = 0;

        // A comment on the same line as the previous token only groups with
        // comments on that same line.
        if prev_token_row == Some(run[0].start_position().row) {
            let (group, _) = take_group(run, &mut j, 0, source);
            groups.push(group);
        }

        let mut last = None;
        while j < run.len() {
            let (group, endline) = take_group(run, &mut j, 1, source);
            groups.push(group);
            last = Some((groups.len() - 1, endline));
        }

        if let (Some((index, endline)), Some(next)) = (last, leaves.get(i)) {
            if endline + 1 == next.start_position().row {
                leads.insert(next.start_byte(), index);
            }
        }
    }

    (groups, leads)
}

/// Takes comments while each starts no more than `gap` lines after the previous one ends.
fn take_group(run: &[TsNode], j: &mut usize, gap: usize, source: &str) -> (CommentGroup, usize) {
    let mut endline = run[*j].start_position().row;
    let mut comments = Vec::new();

    while *j < run.len() && run[*j].start_position().row <= endline + gap {
        let node = run[*j];
        comments.push(Comment {
            span: Span::new(node.start_byte(), node.end_byte()),
            text: source[node.byte_range()].to_string(),
        });
        endline = node.end_position().row;
        *j += 1;
    }

    (CommentGroup { comments }, endline)
}

/// @ai:intent Start byte of the first non-comment token of a node
/// @ai:effects pure
fn first_token_start(node: TsNode) -> usize {
    let mut current = node;
    loop {
        let mut cursor = current.walk();
        let next = current
            .children(&mut cursor)
            .find(|child| child.kind() != COMMENT);
        match next {
            Some(child) => current = child,
            None => return current.start_byte(),
        }
    }
}

fn span_of(node: TsNode) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Converts tree-sitter nodes into syntax tree nodes.
struct Builder<'s> {
    source: &'s str,
    groups: &'s [CommentGroup],
    leads: HashMap<usize, usize>,
}

impl<'s> Builder<'s> {
    fn text(&self, node: TsNode) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn field_texts(&self, node: TsNode, field: &str) -> Vec<String> {
        let mut cursor = node.walk();
        node.children_by_field_name(field, &mut cursor)
            .map(|n| self.text(n).to_string())
            .collect()
    }

    fn field_text(&self, node: TsNode, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    /// @ai:intent Doc slot holding the lead comment of the node's first token, if any
    fn doc_for(&self, node: TsNode) -> Slot<CommentGroup> {
        match self.leads.get(&first_token_start(node)) {
            Some(&index) => {
                let group = self.groups[index].clone();
                Slot::parsed(group.span(), group)
            }
            None => Slot::empty(),
        }
    }

    fn top_level(&self, root: TsNode) -> Vec<Node> {
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter_map(|child| match child.kind() {
                "function_declaration" | "method_declaration" => Some(self.func_decl(child)),
                "import_declaration" | "const_declaration" | "var_declaration"
                | "type_declaration" => Some(self.gen_decl(child)),
                _ => None,
            })
            .collect()
    }

    fn func_decl(&self, node: TsNode) -> Node {
        Node::FuncDecl(FuncDecl {
            name: self.field_text(node, "name"),
            span: span_of(node),
            doc: self.doc_for(node),
            children: self.nested_children(node),
        })
    }

    fn gen_decl(&self, node: TsNode) -> Node {
        let mut specs = Vec::new();
        self.collect_specs(node, &mut specs);

        Node::GenDecl(GenDecl {
            span: span_of(node),
            doc: self.doc_for(node),
            specs,
        })
    }

    fn collect_specs(&self, node: TsNode, out: &mut Vec<Node>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_spec" | "type_alias" => out.push(Node::TypeSpec(TypeSpec {
                    name: self.field_text(child, "name"),
                    span: span_of(child),
                    doc: self.doc_for(child),
                    children: self.nested_children(child),
                })),
                "const_spec" | "var_spec" => out.push(Node::ValueSpec(ValueSpec {
                    names: self.field_texts(child, "name"),
                    span: span_of(child),
                    doc: self.doc_for(child),
                    children: self.nested_children(child),
                })),
                "var_spec_list" | "const_spec_list" | "type_spec_list" => {
                    self.collect_specs(child, out)
                }
                _ => {}
            }
        }
    }

    fn nested_children(&self, node: TsNode) -> Vec<Node> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_nested(child, &mut out);
        }
        out
    }

    /// @ai:intent Find struct types, interface types and local declarations below a node
    fn collect_nested(&self, node: TsNode, out: &mut Vec<Node>) {
        match node.kind() {
            "struct_type" => out.push(self.struct_type(node)),
            "interface_type" => out.push(self.interface_type(node)),
            "const_declaration" | "var_declaration" | "type_declaration" => {
                out.push(self.gen_decl(node))
            }
            COMMENT => {}
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.collect_nested(child, out);
                }
            }
        }
    }

    fn struct_type(&self, node: TsNode) -> Node {
        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for list in node
            .children(&mut cursor)
            .filter(|c| c.kind() == "field_declaration_list")
        {
            let mut list_cursor = list.walk();
            for decl in list
                .named_children(&mut list_cursor)
                .filter(|c| c.kind() == "field_declaration")
            {
                fields.push(self.field(decl));
            }
        }

        Node::Struct(StructType {
            span: span_of(node),
            fields,
        })
    }

    fn field(&self, node: TsNode) -> Node {
        let tag = node
            .child_by_field_name("tag")
            .and_then(|n| Tag::from_literal(self.text(n)).map(|tag| Slot::parsed(span_of(n), tag)))
            .unwrap_or_default();

        let mut children = Vec::new();
        if let Some(ty) = node.child_by_field_name("type") {
            self.collect_nested(ty, &mut children);
        }

        Node::Field(Field {
            names: self.field_texts(node, "name"),
            span: span_of(node),
            doc: self.doc_for(node),
            tag,
            children,
        })
    }

    fn interface_type(&self, node: TsNode) -> Node {
        let mut cursor = node.walk();
        let elements = node
            .named_children(&mut cursor)
            .filter(|c| {
                matches!(
                    c.kind(),
                    "method_elem" | "method_spec" | "type_elem" | "constraint_elem"
                        | "interface_type_name"
                )
            })
            .map(|element| {
                Node::Field(Field {
                    names: self.field_texts(element, "name"),
                    span: span_of(element),
                    doc: self.doc_for(element),
                    tag: Slot::empty(),
                    children: self.nested_children(element),
                })
            })
            .collect();

        Node::Interface(InterfaceType {
            span: span_of(node),
            elements,
        })
    }
}
