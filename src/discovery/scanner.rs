//! File system scanner for shader sources.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use super::manifest::Manifest;

/// Recursively collect files under `root` whose name matches `filter`,
/// skipping manifest excludes. Results are sorted by path.
pub fn scan_directory(root: &Path, filter: &Pattern, manifest: &Manifest) -> Vec<PathBuf> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| filter.matches_with(name, options))
        })
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !manifest.is_excluded(relative)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}
