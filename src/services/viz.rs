//! Visualization handoff
//!
//! The Visualize step hands the final table to the explorer view together
//! with an opaque JSON config blob at a fixed path. The blob's schema
//! belongs to the visualization surface, not to us: we load it, pass it
//! along, and write it back unchanged on exit so the read-write contract
//! holds without inventing a schema.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed location of the visualization config blob
pub const VIZ_CONFIG_PATH: &str = "sheetwiz_viz.json";

/// The opaque visualization config
#[derive(Debug, Clone)]
pub struct VizConfig {
    path: PathBuf,
    pub spec: serde_json::Value,
}

impl VizConfig {
    /// An empty config bound to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            spec: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Load the blob from disk
    ///
    /// A missing file yields an empty object. Unreadable or malformed JSON
    /// is an error for the caller to report; it is not fatal to the wizard.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let spec: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            spec,
        })
    }

    /// Write the blob back to its path
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.spec)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}
