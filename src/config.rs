//! Serializable filter settings, for embedding a filter in a host tool's configuration file.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{FilterOptions, PatternFilter};

/// Pattern lists and options as they appear in a configuration file. Every field is optional.
///
/// ```toml
/// allowed = ["_IMAGE_EXTENSIONS_", "*.svg"]
/// excluded = ["cache/**", ".*"]
/// ignore_case = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub allowed: Vec<String>,
    pub excluded: Vec<String>,
    pub ignore_case: bool,
    pub anchored: bool,
}

impl FilterConfig {
    /// The matching options part of this configuration.
    pub fn options(&self) -> FilterOptions {
        FilterOptions {
            ignore_case: self.ignore_case,
            anchored: self.anchored,
        }
    }

    /// Compile the configured lists, see [`PatternFilter::compile`].
    pub fn compile(&self) -> Result<PatternFilter> {
        PatternFilter::compile_with(&self.allowed, &self.excluded, self.options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ListKind;

    #[test]
    fn missing_fields_use_defaults() {
        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());

        let filter = config.compile().unwrap();
        assert!(filter.is_allowed("a.webp"));
        assert!(!filter.is_allowed("a.svg"));
    }

    #[test]
    fn compiles_configured_lists() {
        let config: FilterConfig = serde_json::from_str(
            r#"{
                "allowed": ["_IMAGE_EXTENSIONS_", "*.svg"],
                "excluded": ["cache/**", ".*"],
                "ignore_case": true
            }"#,
        )
        .unwrap();
        let filter = config.compile().unwrap();

        assert!(filter.is_allowed("icons/logo.SVG"));
        assert!(filter.is_allowed("a/b/photo.png"));
        assert!(!filter.is_allowed("cache/photo.png"));
        assert!(!filter.is_allowed("a/.hidden.png"));
        assert!(filter.options().ignore_case);
    }

    #[test]
    fn invalid_configured_pattern() {
        let config = FilterConfig {
            excluded: vec!["[x".to_string()],
            ..Default::default()
        };
        assert_eq!(config.compile().unwrap_err().list(), ListKind::Excluded);
    }
}
