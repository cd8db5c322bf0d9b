//! @ai:module:intent Configuration for which annotations are stripped and how output is formatted
//! @ai:module:layer domain
//! @ai:module:public_api StripConfig, FormatterKind
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Marker looked for in comment text.
pub const DEFAULT_MARKER: &str = "kubebuilder";

/// Tag key removed from struct field tags.
pub const DEFAULT_EXCLUDED_KEY: &str = "json";

/// @ai:intent Selects the canonical formatting backend used after mutation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    /// `gofmt` when it is on PATH, the builtin layout otherwise
    #[default]
    Auto,
    Builtin,
    Gofmt,
}

/// @ai:intent Configuration for a strip run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StripConfig {
    pub marker: String,
    pub excluded_key: String,
    pub formatter: FormatterKind,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            excluded_key: DEFAULT_EXCLUDED_KEY.to_string(),
            formatter: FormatterKind::Auto,
        }
    }
}

impl StripConfig {
    /// @ai:intent Reject configurations that would strip everything or nothing meaningful
    /// @ai:post Ok only if marker and key are non-empty and the key is a single tag key
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.marker.is_empty() {
            return Err(Error::Config("marker must not be empty".to_string()));
        }
        if self.excluded_key.is_empty() {
            return Err(Error::Config("excluded key must not be empty".to_string()));
        }
        if self
            .excluded_key
            .chars()
            .any(|c| c == ':' || c.is_whitespace())
        {
            return Err(Error::Config(format!(
                "excluded key `{}` must not contain ':' or whitespace",
                self.excluded_key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StripConfig::default();
        assert_eq!(config.marker, "kubebuilder");
        assert_eq!(config.excluded_key, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let config = StripConfig {
            marker: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_key_with_colon_rejected() {
        let config = StripConfig {
            excluded_key: "json:".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
