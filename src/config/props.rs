//! Process-configuration view consumed by the conf builder and the runtime
//! resolver. The runtime owns its real settings store; this type is the thin
//! read surface this crate needs: all pairs, single value with default, and
//! boolean flags.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeProps {
    #[serde(flatten)]
    entries: HashMap<String, String>,
}

impl RuntimeProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Load props from a flat JSON object of string keys to string values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading props file {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing props file {}", path.display()))?;
        Ok(Self { entries })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Single value with default.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Boolean flag; `None` when the key is absent.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(truthy)
    }

    /// All key/value pairs, unordered.
    pub fn all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flag parsing shared with the runtime resolver's env fallback.
pub(crate) fn truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_falls_back() {
        let props = RuntimeProps::from_pairs([("a", "1")]);
        assert_eq!(props.get_or("a", "9"), "1");
        assert_eq!(props.get_or("b", "9"), "9");
    }

    #[test]
    fn flag_parses_common_spellings() {
        let props = RuntimeProps::from_pairs([
            ("t1", "true"),
            ("t2", "1"),
            ("t3", " Yes "),
            ("f1", "false"),
            ("f2", "0"),
            ("f3", "anything"),
        ]);
        for key in ["t1", "t2", "t3"] {
            assert_eq!(props.flag(key), Some(true), "{key}");
        }
        for key in ["f1", "f2", "f3"] {
            assert_eq!(props.flag(key), Some(false), "{key}");
        }
        assert_eq!(props.flag("absent"), None);
    }

    #[test]
    fn json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.json");
        std::fs::write(&path, r#"{"gridflow.buffer.size": "8192", "k": "v"}"#).unwrap();
        let props = RuntimeProps::from_json_file(&path).unwrap();
        assert_eq!(props.get("gridflow.buffer.size"), Some("8192"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn json_file_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RuntimeProps::from_json_file(&dir.path().join("absent.json")).is_err());
    }
}
