//! Shader file discovery.
//!
//! Finds the optional `wgsldoc.yaml` manifest and walks the source tree
//! for files matching the configured name filter.

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{DocError, Result};

pub use manifest::Manifest;
pub use scanner::scan_directory;

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "wgsldoc.yaml";

/// Default file-name filter.
pub const DEFAULT_FILTER: &str = "*.wgsl";

/// Load the manifest at `explicit`, or `wgsldoc.yaml` in `dir` when present.
///
/// Returns the manifest and the path it was read from, if any. An explicit
/// path that does not exist is an error; a missing default manifest is not.
pub fn load_manifest(dir: &Path, explicit: Option<&Path>) -> Result<(Manifest, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((Manifest::load(path)?, Some(path.to_path_buf())));
    }

    let path = dir.join(MANIFEST_FILENAME);
    if path.is_file() {
        Ok((Manifest::load(&path)?, Some(path)))
    } else {
        Ok((Manifest::default(), None))
    }
}

/// Compile a file-name filter.
pub fn compile_filter(filter: &str) -> Result<Pattern> {
    Pattern::new(filter).map_err(|e| DocError::Config {
        message: format!("Invalid filter '{}': {}", filter, e),
        help: Some("Use a file-name glob such as *.wgsl".to_string()),
    })
}

/// Discover shader files under `root`.
pub fn discover(root: &Path, filter: &str, manifest: &Manifest) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DocError::Config {
            message: format!("Source directory '{}' does not exist", root.display()),
            help: Some("Pass --source or set `source` in wgsldoc.yaml".to_string()),
        });
    }

    let pattern = compile_filter(filter)?;
    let files = scan_directory(root, &pattern, manifest);
    tracing::debug!(root = %root.display(), filter, files = files.len(), "scanned source tree");
    Ok(files)
}
