//! @ai:module:intent Remove marker comments and excluded tag fragments from a syntax tree in place
//! @ai:module:layer application
//! @ai:module:public_api strip, MutationReport
//! @ai:module:depends_on matcher, syntax
//! @ai:module:stateless true

use crate::matcher::Matcher;
use crate::syntax::{Node, SourceFile, Tag};
use serde::{Deserialize, Serialize};

/// @ai:intent Counts of what a mutation removed or rewrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    pub comments_removed: usize,
    pub docs_cleared: usize,
    pub tags_rewritten: usize,
    pub tags_cleared: usize,
}

impl MutationReport {
    /// @ai:intent Check whether the mutation changed anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: MutationReport) {
        self.comments_removed += other.comments_removed;
        self.docs_cleared += other.docs_cleared;
        self.tags_rewritten += other.tags_rewritten;
        self.tags_cleared += other.tags_cleared;
    }
}

/// @ai:intent Apply every removal rule to a file's tree
/// @ai:post no retained comment group or doc contains the marker
/// @ai:post no retained tag fragment has the excluded key; emptied tags are absent
/// @ai:idempotent true
/// @ai:effects pure
pub fn strip(file: &mut SourceFile, matcher: &Matcher) -> MutationReport {
    let mut report = MutationReport {
        comments_removed: strip_file_comments(file, matcher),
        ..Default::default()
    };

    file.walk_mut(|node| {
        if let Some(documented) = node.as_documented_mut() {
            if matcher.is_marked(documented.doc()) {
                documented.clear_doc();
                report.docs_cleared += 1;
            }
        }

        if let Node::Struct(strukt) = node {
            for field in strukt.fields_mut() {
                match rewrite_tag(field.tag.get(), matcher) {
                    TagRewrite::Keep => {}
                    TagRewrite::Clear => {
                        field.tag.clear();
                        report.tags_cleared += 1;
                    }
                    TagRewrite::Replace(content) => {
                        if let Some(tag) = field.tag.get_mut() {
                            tag.content = content;
                        }
                        report.tags_rewritten += 1;
                    }
                }
            }
        }
    });

    report
}

/// @ai:intent Drop marked groups from the file-level comment table, preserving order
/// @ai:effects pure
fn strip_file_comments(file: &mut SourceFile, matcher: &Matcher) -> usize {
    let before = file.comments.len();
    file.comments.retain(|group| !matcher.is_marked(Some(group)));
    before - file.comments.len()
}

enum TagRewrite {
    Keep,
    Clear,
    Replace(String),
}

/// @ai:intent Decide what happens to one field tag
/// @ai:post retained fragments are rejoined with single spaces, so spacing is normalised
/// @ai:edge_cases an empty tag has no retained fragments and is cleared
/// @ai:effects pure
fn rewrite_tag(tag: Option<&Tag>, matcher: &Matcher) -> TagRewrite {
    let Some(tag) = tag else {
        return TagRewrite::Keep;
    };

    let retained = matcher.retained_fragments(&tag.content);
    if retained.is_empty() {
        return TagRewrite::Clear;
    }

    let content = retained.join(" ");
    if content == tag.content {
        TagRewrite::Keep
    } else {
        TagRewrite::Replace(content)
    }
}
