//! Per-file aggregate of everything extracted from one shader.

use std::path::PathBuf;

use serde::Serialize;

use super::{any_conditional, Binding, Const, Function, Structure, TypeInfo};
use crate::parser::DeclaredImports;

/// Where a file came from and where its page goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    /// File name with extension, e.g. `mesh.wgsl`.
    pub filename: String,
    /// Path relative to the source root.
    pub source_path: PathBuf,
    /// Page path relative to the versioned output directory.
    pub doc_path: String,
    /// `<version>/<doc_path>`.
    pub link: String,
    /// Hosted source URL.
    pub source_link: String,
}

/// The documentation model for one shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Path declared with `#define_import_path`.
    pub import_path: Option<String>,
    pub declared_imports: DeclaredImports,
    pub consts: Vec<Const>,
    pub structures: Vec<Structure>,
    pub functions: Vec<Function>,
    pub bindings: Vec<Binding>,
    #[serde(flatten)]
    pub meta: FileMeta,
}

impl ParsedFile {
    /// Other files can import from this one.
    pub fn is_exportable(&self) -> bool {
        self.import_path.is_some()
    }

    /// Site-absolute link to this file's page.
    pub fn normalized_link(&self) -> String {
        normalize_link(&self.meta.link)
    }

    pub fn structure_names(&self) -> Vec<&str> {
        self.structures.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn consts_have_shader_defs(&self) -> bool {
        any_conditional(&self.consts)
    }

    pub fn structures_have_shader_defs(&self) -> bool {
        any_conditional(&self.structures)
    }

    pub fn bindings_have_shader_defs(&self) -> bool {
        any_conditional(&self.bindings)
    }

    pub fn declaration_count(&self) -> usize {
        self.consts.len() + self.structures.len() + self.functions.len() + self.bindings.len()
    }

    /// Visit every type reference in the file.
    pub fn for_each_type_info_mut(&mut self, mut visit: impl FnMut(&mut TypeInfo)) {
        for structure in &mut self.structures {
            for field in &mut structure.fields {
                visit(&mut field.type_info);
            }
        }
        for constant in &mut self.consts {
            visit(&mut constant.type_info);
        }
        for binding in &mut self.bindings {
            visit(&mut binding.type_info);
        }
        for function in &mut self.functions {
            for param in &mut function.params {
                visit(&mut param.type_info);
            }
            if let Some(return_type) = &mut function.return_type {
                visit(return_type);
            }
        }
    }
}

/// Prefix with `/` and drop any `src/` segment.
pub fn normalize_link(link: &str) -> String {
    let link = link.replace("src/", "");
    if link.starts_with('/') {
        link
    } else {
        format!("/{}", link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("0.15.0/bevy_pbr/mesh.html"), "/0.15.0/bevy_pbr/mesh.html");
        assert_eq!(normalize_link("/mod.html"), "/mod.html");
        assert_eq!(normalize_link("v/src/a.html"), "/v/a.html");
    }

    #[test]
    fn test_for_each_type_info_visits_return_types() {
        let mut file = ParsedFile::default();
        file.functions.push(Function {
            stage_attribute: None,
            workgroup_size: Vec::new(),
            name: "f".to_string(),
            line_number: 1,
            params: Vec::new(),
            return_type: Some(TypeInfo::from_source("Bar")),
            comment: String::new(),
            context: Default::default(),
            annotations: Vec::new(),
        });

        let mut seen = Vec::new();
        file.for_each_type_info_mut(|info| seen.push(info.ty.clone()));

        assert_eq!(seen, vec!["Bar".to_string()]);
    }
}
