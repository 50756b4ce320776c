//! `local.properties` loading
//!
//! Gradle's `local.properties` is a line-delimited `key=value` file kept out
//! of version control. A missing file is normal (CI resolves everything from
//! the environment and is handed an empty mapping); a malformed existing file
//! fails the configuration pass before any build step runs.

use crate::error::{Error, Result, ResultExt};
use std::collections::BTreeMap;
use std::path::Path;

/// Conventional file name, relative to the Android project root
pub const LOCAL_PROPERTIES: &str = "local.properties";

/// Parsed key/value pairs from an optional `local.properties` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProperties {
    entries: BTreeMap<String, String>,
}

impl LocalProperties {
    /// Load properties from a file path, returning an empty mapping if the
    /// file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no local.properties, using empty mapping");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("While reading {}", path.display()))?;

        Self::parse_named(&content, path)
    }

    /// Parse properties from in-memory text
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_named(content, Path::new(LOCAL_PROPERTIES))
    }

    fn parse_named(content: &str, path: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            // First '=' splits; later ones belong to the value (tokens and
            // Windows sdk.dir paths routinely contain '=' and ':').
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::properties_parse(path, idx + 1));
            };

            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { entries })
    }

    /// Look up a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
