//! @ai:module:intent Decide which comment groups and tag fragments are removal targets
//! @ai:module:layer domain
//! @ai:module:public_api Matcher, is_marked_comment, is_excluded_tag_fragment, tag_fragments
//! @ai:module:depends_on syntax
//! @ai:module:stateless true

use crate::config::StripConfig;
use crate::syntax::CommentGroup;

/// @ai:intent Check whether a comment group contains the marker on any of its lines
/// @ai:pre marker is non-empty
/// @ai:post false for an absent or empty group
/// @ai:example (Some(["// +kubebuilder:validation:Required"]), "kubebuilder") -> true
/// @ai:example (Some(["// Name of the thing"]), "kubebuilder") -> false
/// @ai:example (None, "kubebuilder") -> false
/// @ai:effects pure
pub fn is_marked_comment(group: Option<&CommentGroup>, marker: &str) -> bool {
    match group {
        Some(group) => group.lines().any(|line| line.contains(marker)),
        None => false,
    }
}

/// @ai:intent Check whether a tag fragment's key equals the excluded key
/// @ai:example ("json:\"name\"", "json") -> true
/// @ai:example ("jsonschema:\"x\"", "json") -> false
/// @ai:example ("json", "json") -> false
/// @ai:edge_cases a fragment without ':' has no key and is never excluded
/// @ai:effects pure
pub fn is_excluded_tag_fragment(fragment: &str, key: &str) -> bool {
    fragment
        .split_once(':')
        .is_some_and(|(fragment_key, _)| fragment_key == key)
}

/// @ai:intent Split raw tag content into fragments on whitespace
///
/// No quoting rules are interpreted: a value containing whitespace inside
/// its quotes (`validate:"min=1 max=2"`) is split into several fragments.
/// Only the first of those carries the key, so the rest are kept or
/// dropped independently of it.
/// @ai:effects pure
pub fn tag_fragments(content: &str) -> impl Iterator<Item = &str> {
    content.split_whitespace()
}

/// @ai:intent Matcher bound to a configured marker and excluded key
#[derive(Debug, Clone)]
pub struct Matcher {
    marker: String,
    excluded_key: String,
}

impl Matcher {
    pub fn new(marker: impl Into<String>, excluded_key: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            excluded_key: excluded_key.into(),
        }
    }

    pub fn from_config(config: &StripConfig) -> Self {
        Self::new(config.marker.clone(), config.excluded_key.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn excluded_key(&self) -> &str {
        &self.excluded_key
    }

    pub fn is_marked(&self, group: Option<&CommentGroup>) -> bool {
        is_marked_comment(group, &self.marker)
    }

    pub fn is_excluded(&self, fragment: &str) -> bool {
        is_excluded_tag_fragment(fragment, &self.excluded_key)
    }

    /// @ai:intent Fragments of a tag that survive, in their original order
    /// @ai:effects pure
    pub fn retained_fragments<'a>(&self, content: &'a str) -> Vec<&'a str> {
        tag_fragments(content)
            .filter(|fragment| !self.is_excluded(fragment))
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::from_config(&StripConfig::default())
    }
}
