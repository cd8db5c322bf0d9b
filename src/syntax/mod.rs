//! @ai:module:intent Syntax tree for one Go source file: declarations, fields, comments, tags
//! @ai:module:layer domain
//! @ai:module:public_api SourceFile, Node, Documented, Slot, CommentGroup, Comment, Tag, Span
//! @ai:module:depends_on syntax::parse
//! @ai:module:stateless true
//!
//! The tree only models what annotation stripping needs: the five kinds of
//! declaration that can carry a doc comment, the struct and interface types
//! that hold fields, and every comment group in the file. Everything else is
//! left as text in the original source, which the printer splices edits into.

pub mod parse;

pub use parse::parse;

/// @ai:intent Byte range into the original source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// @ai:intent A single `//` or `/* */` comment, delimiters included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub text: String,
}

/// @ai:intent A run of adjacent comments with no blank line or token between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// @ai:intent Span from the first comment's start to the last comment's end
    /// @ai:pre group is non-empty
    pub fn span(&self) -> Span {
        let start = self.comments.first().map_or(0, |c| c.span.start);
        let end = self.comments.last().map_or(start, |c| c.span.end);
        Span::new(start, end)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// @ai:intent Comment texts in source order
    /// @ai:effects pure
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.comments.iter().map(|c| c.text.as_str())
    }
}

/// @ai:intent Delimiter syntax of a struct tag literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDelimiter {
    /// raw string: `` `json:"name"` ``
    Backtick,
    /// interpreted string: `"json:\"name\""`
    Quote,
}

impl TagDelimiter {
    pub fn as_char(self) -> char {
        match self {
            TagDelimiter::Backtick => '`',
            TagDelimiter::Quote => '"',
        }
    }
}

/// @ai:intent A struct field tag: its delimiter and the raw text between the delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub delimiter: TagDelimiter,
    pub content: String,
}

impl Tag {
    /// @ai:intent Split a tag literal as written in source into delimiter and content
    /// @ai:example ("`json:\"a\"`") -> Some(Tag { Backtick, "json:\"a\"" })
    /// @ai:effects pure
    pub fn from_literal(literal: &str) -> Option<Self> {
        let delimiter = match literal.chars().next()? {
            '`' => TagDelimiter::Backtick,
            '"' => TagDelimiter::Quote,
            _ => return None,
        };
        let close = delimiter.as_char();
        let content = literal
            .strip_prefix(close)?
            .strip_suffix(close)?
            .to_string();
        Some(Self { delimiter, content })
    }

    /// @ai:intent Render the tag back into a literal with its original delimiter
    /// @ai:effects pure
    pub fn literal(&self) -> String {
        let d = self.delimiter.as_char();
        format!("{d}{}{d}", self.content)
    }
}

/// @ai:intent Attachment point remembering where its value was parsed from
///
/// Clearing a slot leaves the original span behind so the printer knows
/// which source text to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<T> {
    origin: Option<Span>,
    value: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Slot<T> {
    pub fn empty() -> Self {
        Self {
            origin: None,
            value: None,
        }
    }

    pub fn parsed(span: Span, value: T) -> Self {
        Self {
            origin: Some(span),
            value: Some(value),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// @ai:intent Set the value to absent, keeping the origin span
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Span of the source text this slot was parsed from.
    pub fn origin(&self) -> Option<Span> {
        self.origin
    }

    /// @ai:intent True when the slot was parsed from source and has since been cleared
    pub fn was_cleared(&self) -> bool {
        self.origin.is_some() && self.value.is_none()
    }
}

/// @ai:intent Capability shared by every node kind that can carry a doc comment
pub trait Documented {
    fn doc(&self) -> Option<&CommentGroup>;

    fn doc_slot(&self) -> &Slot<CommentGroup>;

    fn doc_slot_mut(&mut self) -> &mut Slot<CommentGroup>;

    /// @ai:intent Remove the doc comment, leaving it absent rather than empty
    fn clear_doc(&mut self) {
        self.doc_slot_mut().clear();
    }
}

macro_rules! impl_documented {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Documented for $ty {
                fn doc(&self) -> Option<&CommentGroup> {
                    self.doc.get()
                }

                fn doc_slot(&self) -> &Slot<CommentGroup> {
                    &self.doc
                }

                fn doc_slot_mut(&mut self) -> &mut Slot<CommentGroup> {
                    &mut self.doc
                }
            }
        )+
    };
}

/// `import`, `const`, `var` or `type` declaration, possibly parenthesised.
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub span: Span,
    pub doc: Slot<CommentGroup>,
    pub specs: Vec<Node>,
}

/// Function or method declaration; `children` holds what its signature and body declare.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub span: Span,
    pub doc: Slot<CommentGroup>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub span: Span,
    pub doc: Slot<CommentGroup>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<String>,
    pub span: Span,
    pub doc: Slot<CommentGroup>,
    pub children: Vec<Node>,
}

/// Struct field or interface element. Embedded fields have no names.
#[derive(Debug, Clone)]
pub struct Field {
    pub names: Vec<String>,
    pub span: Span,
    pub doc: Slot<CommentGroup>,
    pub tag: Slot<Tag>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct StructType {
    pub span: Span,
    pub fields: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub span: Span,
    pub elements: Vec<Node>,
}

impl_documented!(GenDecl, FuncDecl, TypeSpec, ValueSpec, Field);

impl StructType {
    /// @ai:intent Iterate the struct's fields mutably
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut().filter_map(|node| match node {
            Node::Field(field) => Some(field),
            _ => None,
        })
    }
}

/// @ai:intent A node of the syntax tree
#[derive(Debug, Clone)]
pub enum Node {
    GenDecl(GenDecl),
    FuncDecl(FuncDecl),
    TypeSpec(TypeSpec),
    ValueSpec(ValueSpec),
    Field(Field),
    Struct(StructType),
    Interface(InterfaceType),
}

impl Node {
    /// @ai:intent View the node through its doc capability, if it has one
    /// @ai:effects pure
    pub fn as_documented(&self) -> Option<&dyn Documented> {
        match self {
            Node::GenDecl(n) => Some(n),
            Node::FuncDecl(n) => Some(n),
            Node::TypeSpec(n) => Some(n),
            Node::ValueSpec(n) => Some(n),
            Node::Field(n) => Some(n),
            Node::Struct(_) | Node::Interface(_) => None,
        }
    }

    pub fn as_documented_mut(&mut self) -> Option<&mut dyn Documented> {
        match self {
            Node::GenDecl(n) => Some(n),
            Node::FuncDecl(n) => Some(n),
            Node::TypeSpec(n) => Some(n),
            Node::ValueSpec(n) => Some(n),
            Node::Field(n) => Some(n),
            Node::Struct(_) | Node::Interface(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::GenDecl(n) => &n.specs,
            Node::FuncDecl(n) => &n.children,
            Node::TypeSpec(n) => &n.children,
            Node::ValueSpec(n) => &n.children,
            Node::Field(n) => &n.children,
            Node::Struct(n) => &n.fields,
            Node::Interface(n) => &n.elements,
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Node::GenDecl(n) => &mut n.specs,
            Node::FuncDecl(n) => &mut n.children,
            Node::TypeSpec(n) => &mut n.children,
            Node::ValueSpec(n) => &mut n.children,
            Node::Field(n) => &mut n.children,
            Node::Struct(n) => &mut n.fields,
            Node::Interface(n) => &mut n.elements,
        }
    }

    /// @ai:intent Visit this node and all descendants, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// @ai:intent Mutable pre-order visit of this node and all descendants
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in self.children_mut() {
            child.walk_mut(visit);
        }
    }
}

/// @ai:intent Parsed Go source file: original text, file-level comment table and declarations
#[derive(Debug, Clone)]
pub struct SourceFile {
    source: String,
    original_comments: Vec<CommentGroup>,
    pub comments: Vec<CommentGroup>,
    pub decls: Vec<Node>,
}

impl SourceFile {
    pub(crate) fn new(source: String, comments: Vec<CommentGroup>, decls: Vec<Node>) -> Self {
        let original_comments = comments.clone();
        Self {
            source,
            original_comments,
            comments,
            decls,
        }
    }

    /// Text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every comment group as parsed, before any mutation.
    pub fn original_comments(&self) -> &[CommentGroup] {
        &self.original_comments
    }

    /// @ai:intent Visit every node in tree order
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Node)) {
        for decl in &self.decls {
            decl.walk(&mut visit);
        }
    }

    /// @ai:intent Mutably visit every node in tree order
    pub fn walk_mut(&mut self, mut visit: impl FnMut(&mut Node)) {
        for decl in &mut self.decls {
            decl.walk_mut(&mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_literal_roundtrip() {
        let tag = Tag::from_literal("`json:\"name\" yaml:\"name\"`").unwrap();
        assert_eq!(tag.delimiter, TagDelimiter::Backtick);
        assert_eq!(tag.content, "json:\"name\" yaml:\"name\"");
        assert_eq!(tag.literal(), "`json:\"name\" yaml:\"name\"`");
    }

    #[test]
    fn test_tag_quoted() {
        let tag = Tag::from_literal(r#""json:\"id\"""#).unwrap();
        assert_eq!(tag.delimiter, TagDelimiter::Quote);
        assert_eq!(tag.content, r#"json:\"id\""#);
    }

    #[test]
    fn test_tag_rejects_non_string() {
        assert!(Tag::from_literal("42").is_none());
        assert!(Tag::from_literal("`unterminated").is_none());
    }

    #[test]
    fn test_slot_clear_keeps_origin() {
        let mut slot = Slot::parsed(Span::new(3, 9), 1u8);
        assert!(!slot.was_cleared());
        slot.clear();
        assert!(slot.was_cleared());
        assert_eq!(slot.origin(), Some(Span::new(3, 9)));
        assert!(!Slot::<u8>::empty().was_cleared());
    }

    #[test]
    fn test_documented_clear() {
        let group = CommentGroup {
            comments: vec![Comment {
                span: Span::new(0, 5),
                text: "// x".to_string(),
            }],
        };
        let mut node = Node::FuncDecl(FuncDecl {
            name: "f".to_string(),
            span: Span::new(6, 20),
            doc: Slot::parsed(group.span(), group),
            children: Vec::new(),
        });
        let documented = node.as_documented_mut().unwrap();
        assert!(documented.doc().is_some());
        documented.clear_doc();
        assert!(node.as_documented().unwrap().doc().is_none());
    }
}
