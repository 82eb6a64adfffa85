//! Client-side search index.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{DocError, Result};
use crate::types::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Function,
    Struct,
    Const,
    Binding,
}

/// One searchable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub link: String,
    pub filename: String,
    pub exportable: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    /// Empty unless the entry is an entry-point function.
    pub stage_attribute: String,
    pub comment: String,
}

impl SearchEntry {
    fn new(file: &ParsedFile, name: &str, kind: SearchKind) -> Self {
        Self {
            link: file.normalized_link(),
            filename: file.meta.filename.clone(),
            exportable: file.is_exportable(),
            name: name.to_string(),
            kind,
            stage_attribute: String::new(),
            comment: String::new(),
        }
    }
}

/// Entries for every declaration, file by file: functions, structs, consts
/// then bindings.
pub fn build_search_index(files: &[ParsedFile]) -> Vec<SearchEntry> {
    let mut entries = Vec::new();

    for file in files {
        for function in &file.functions {
            let mut entry = SearchEntry::new(file, &function.name, SearchKind::Function);
            entry.stage_attribute = function
                .stage_attribute
                .map(|s| s.as_str().to_string())
                .unwrap_or_default();
            entry.comment = function.comment.clone();
            entries.push(entry);
        }
        for structure in &file.structures {
            let mut entry = SearchEntry::new(file, &structure.name, SearchKind::Struct);
            entry.comment = structure.comment.clone();
            entries.push(entry);
        }
        for constant in &file.consts {
            entries.push(SearchEntry::new(file, &constant.name, SearchKind::Const));
        }
        for binding in &file.bindings {
            entries.push(SearchEntry::new(file, &binding.name, SearchKind::Binding));
        }
    }

    entries
}

/// Write the index as pretty-printed JSON.
pub fn write_search_index(path: &Path, entries: &[SearchEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).map_err(|e| DocError::Render {
        message: format!("Failed to serialize search index: {}", e),
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    fs::write(path, json).map_err(|e| DocError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file(source: &str, filename: &str, link: &str) -> ParsedFile {
        let mut file = parse_source(source).unwrap().file;
        file.meta.filename = filename.to_string();
        file.meta.link = link.to_string();
        file
    }

    #[test]
    fn test_entry_order_and_fields() {
        let files = vec![file(
            "#define_import_path demo::lib\n\
             @group(0) @binding(0) var<uniform> view: View;\n\
             const K = 1.0;\n\
             // A view.\n\
             struct View { x: f32 }\n\
             // Entry.\n\
             @fragment\n\
             fn main() {}\n",
            "lib.wgsl",
            "0.15.0/demo/lib.html",
        )];

        let entries = build_search_index(&files);
        let kinds: Vec<_> = entries.iter().map(|e| (e.kind, e.name.as_str())).collect();

        assert_eq!(
            kinds,
            vec![
                (SearchKind::Function, "main"),
                (SearchKind::Struct, "View"),
                (SearchKind::Const, "K"),
                (SearchKind::Binding, "view"),
            ]
        );
        assert_eq!(entries[0].stage_attribute, "fragment");
        assert_eq!(entries[0].comment, "Entry.");
        assert_eq!(entries[1].comment, "A view.");
        assert!(entries.iter().all(|e| e.exportable));
        assert!(entries.iter().all(|e| e.link == "/0.15.0/demo/lib.html"));
    }

    #[test]
    fn test_non_exportable_file() {
        let files = vec![file("const A = 1;\n", "a.wgsl", "v/a.html")];

        let entries = build_search_index(&files);

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].exportable);
        assert_eq!(entries[0].stage_attribute, "");
    }

    #[test]
    fn test_write_search_index_json_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("public/search-info-0.15.0.json");
        let files = vec![file("fn f() {}\n", "f.wgsl", "v/f.html")];

        write_search_index(&path, &build_search_index(&files)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        insta::assert_json_snapshot!(value, @r###"
        [
          {
            "comment": "",
            "exportable": false,
            "filename": "f.wgsl",
            "link": "/v/f.html",
            "name": "f",
            "stageAttribute": "",
            "type": "function"
          }
        ]
        "###);
    }
}
