//! Cross-file import index: declared import path -> page link.

use std::collections::HashMap;

/// Filled during the sequential parse phase, then only read.
#[derive(Debug, Clone, Default)]
pub struct ImportIndex {
    entries: HashMap<String, String>,
}

impl ImportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's import path. The first file to claim a path keeps
    /// it; returns false for later claims.
    pub fn insert(&mut self, import_path: impl Into<String>, link: impl Into<String>) -> bool {
        let import_path = import_path.into();
        if self.entries.contains_key(&import_path) {
            return false;
        }
        self.entries.insert(import_path, link.into());
        true
    }

    pub fn get(&self, import_path: &str) -> Option<&str> {
        self.entries.get(import_path).map(String::as_str)
    }

    /// Link of the longest registered path that is a string prefix of
    /// `full_path`.
    pub fn longest_prefix(&self, full_path: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(module, _)| full_path.starts_with(module.as_str()))
            .max_by_key(|(module, _)| module.len())
            .map(|(_, link)| link.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let mut index = ImportIndex::new();
        index.insert("bevy_pbr", "/v/bevy_pbr.html");
        index.insert("bevy_pbr::mesh_functions", "/v/mesh_functions.html");

        assert_eq!(
            index.longest_prefix("bevy_pbr::mesh_functions::get_model_matrix"),
            Some("/v/mesh_functions.html")
        );
        assert_eq!(index.longest_prefix("bevy_pbr::utils::PI"), Some("/v/bevy_pbr.html"));
        assert_eq!(index.longest_prefix("bevy_render::maths"), None);
    }

    #[test]
    fn test_first_claim_keeps_path() {
        let mut index = ImportIndex::new();

        assert!(index.insert("a", "/first.html"));
        assert!(!index.insert("a", "/second.html"));
        assert_eq!(index.get("a"), Some("/first.html"));
        assert_eq!(index.len(), 1);
    }
}
