//! Environment variable lookup.
//!
//! Resolvers read the environment through [`EnvLookup`] so callers and tests
//! can supply a fixed map instead of mutating the process environment.

use std::collections::{BTreeMap, HashMap};

pub trait EnvLookup: Send + Sync {
    /// Value of `key`; empty values are reported as absent.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }
}

/// `1`, `true`, `yes` and `on` (any case) are truthy.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup_skips_empty() {
        let mut env = HashMap::new();
        env.insert("A".to_string(), "x".to_string());
        env.insert("B".to_string(), "  ".to_string());
        assert_eq!(env.var("A").as_deref(), Some("x"));
        assert_eq!(env.var("B"), None);
        assert_eq!(env.var("C"), None);
    }

    #[test]
    fn test_process_env_missing() {
        assert_eq!(ProcessEnv.var("BYKILT_SURELY_UNSET_VAR_9431"), None);
    }

    #[test]
    fn test_truthy() {
        for v in ["1", "true", "TRUE", "yes", " on "] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "", "no", "off", "maybe"] {
            assert!(!is_truthy(v), "{v}");
        }
    }
}
