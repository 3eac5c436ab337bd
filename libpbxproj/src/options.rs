//! Parser configuration.

use std::env;

/// Default limit on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Knobs that change how strictly a document is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of mappings and arrays. The root container is depth 1.
    pub max_depth: usize,
    /// Fail on a key that appears twice in one mapping instead of keeping the last value.
    pub reject_duplicate_keys: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_duplicate_keys: false,
        }
    }
}

impl ParseOptions {
    /// Defaults overridden by `PBXPROJ_MAX_DEPTH` and `PBXPROJ_STRICT_KEYS`.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("PBXPROJ_MAX_DEPTH").ok().as_deref(),
            env::var("PBXPROJ_STRICT_KEYS").ok().as_deref(),
        )
    }

    fn from_vars(max_depth: Option<&str>, strict_keys: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            max_depth: max_depth
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_depth),
            reject_duplicate_keys: strict_keys
                .map(is_truthy)
                .unwrap_or(defaults.reject_duplicate_keys),
        }
    }
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::from_vars(None, None);
        assert_eq!(options, ParseOptions::default());
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!options.reject_duplicate_keys);
    }

    #[test]
    fn test_overrides() {
        let options = ParseOptions::from_vars(Some("16"), Some("YES"));
        assert_eq!(options.max_depth, 16);
        assert!(options.reject_duplicate_keys);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let options = ParseOptions::from_vars(Some("deep"), Some("0"));
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!options.reject_duplicate_keys);

        let options = ParseOptions::from_vars(Some("0"), None);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
