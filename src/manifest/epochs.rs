//! Epoch table loading and lookup
//!
//! The epoch file is a YAML mapping from package name to a non-negative
//! integer epoch:
//!
//! ```yaml
//! oslo.config: 4
//! python-nose: 1
//! ```
//!
//! An absent file means an empty table; a file that exists but does not
//! parse as such a mapping is a fatal error, since silently treating every
//! package as epoch 0 would corrupt the rendered spec.

use crate::error::ManifestError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from package name to epoch, with a safe default of 0
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EpochTable {
    entries: BTreeMap<String, u64>,
}

impl EpochTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from an optional YAML file
    ///
    /// No path means no epochs, which is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ManifestError> {
        let Some(path) = path else {
            return Ok(Self::new());
        };

        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::EpochRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        serde_yaml::from_str(&content)
            .map_err(|e| ManifestError::invalid_epoch_file(path, e.to_string()))
    }

    /// Look up the epoch for a package name (exact match), defaulting to 0
    pub fn lookup(&self, name: &str) -> u64 {
        self.entries.get(name).copied().unwrap_or(0)
    }

    /// True if the package has an explicit non-default epoch entry
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of explicit entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no explicit entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
