//! Project manifest (wgsldoc.yaml) parsing.
//!
//! Every key is optional; values present here override the built-in
//! defaults and are in turn overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocError, Result};

/// Project manifest loaded from wgsldoc.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Root of the shader tree.
    pub source: Option<PathBuf>,

    /// File-name glob, e.g. `*.wgsl`.
    pub filter: Option<String>,

    /// Output directory for the generated site.
    pub output: Option<PathBuf>,

    /// Base URL of the hosted sources.
    pub source_url: Option<String>,

    /// Version label used in output paths.
    pub version: Option<String>,

    /// JSON file of extra built-in type links.
    pub type_links: Option<PathBuf>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,
}

impl Manifest {
    /// Load manifest from a wgsldoc.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DocError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DocError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check wgsldoc.yaml syntax".to_string()),
        })
    }

    /// Check if a path (relative to the source root) matches an exclude
    /// pattern.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }
}

/// Simple glob forms: `*.ext`, `**/dir/*`, `dir/*`, otherwise substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix) || path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}
