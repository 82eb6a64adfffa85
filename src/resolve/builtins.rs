//! Links for WGSL built-in types.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DocError, Result};

const WGSL_SPEC: &str = "https://www.w3.org/TR/WGSL/";

/// Built-in type name -> anchor in the WGSL specification.
const BUILTIN_ANCHORS: &[(&str, &str)] = &[
    ("bool", "bool-type"),
    ("i32", "integer-types"),
    ("u32", "integer-types"),
    ("f32", "floating-point-types"),
    ("f16", "floating-point-types"),
    ("AbstractInt", "abstractint"),
    ("AbstractFloat", "abstractfloat"),
    ("vec2", "vector-types"),
    ("vec3", "vector-types"),
    ("vec4", "vector-types"),
    ("vec2i", "vector-types"),
    ("vec3i", "vector-types"),
    ("vec4i", "vector-types"),
    ("vec2u", "vector-types"),
    ("vec3u", "vector-types"),
    ("vec4u", "vector-types"),
    ("vec2f", "vector-types"),
    ("vec3f", "vector-types"),
    ("vec4f", "vector-types"),
    ("vec2h", "vector-types"),
    ("vec3h", "vector-types"),
    ("vec4h", "vector-types"),
    ("mat2x2", "matrix-types"),
    ("mat2x3", "matrix-types"),
    ("mat2x4", "matrix-types"),
    ("mat3x2", "matrix-types"),
    ("mat3x3", "matrix-types"),
    ("mat3x4", "matrix-types"),
    ("mat4x2", "matrix-types"),
    ("mat4x3", "matrix-types"),
    ("mat4x4", "matrix-types"),
    ("mat2x2f", "matrix-types"),
    ("mat3x3f", "matrix-types"),
    ("mat4x4f", "matrix-types"),
    ("mat2x2h", "matrix-types"),
    ("mat3x3h", "matrix-types"),
    ("mat4x4h", "matrix-types"),
    ("atomic", "atomic-types"),
    ("array", "array-types"),
    ("ptr", "ref-ptr-types"),
    ("sampler", "sampler-type"),
    ("sampler_comparison", "sampler-type"),
    ("texture_1d", "sampled-texture-type"),
    ("texture_2d", "sampled-texture-type"),
    ("texture_2d_array", "sampled-texture-type"),
    ("texture_3d", "sampled-texture-type"),
    ("texture_cube", "sampled-texture-type"),
    ("texture_cube_array", "sampled-texture-type"),
    ("texture_multisampled_2d", "multisampled-texture-type"),
    ("texture_depth_multisampled_2d", "multisampled-texture-type"),
    ("texture_external", "external-texture-type"),
    ("texture_storage_1d", "texture-storage"),
    ("texture_storage_2d", "texture-storage"),
    ("texture_storage_2d_array", "texture-storage"),
    ("texture_storage_3d", "texture-storage"),
    ("texture_depth_2d", "texture-depth"),
    ("texture_depth_2d_array", "texture-depth"),
    ("texture_depth_cube", "texture-depth"),
    ("texture_depth_cube_array", "texture-depth"),
];

/// Type name -> documentation URL.
#[derive(Debug, Clone)]
pub struct TypeLinks {
    links: HashMap<String, String>,
}

impl Default for TypeLinks {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeLinks {
    /// The WGSL built-in table.
    pub fn builtin() -> Self {
        let links = BUILTIN_ANCHORS
            .iter()
            .map(|(name, anchor)| (name.to_string(), format!("{}#{}", WGSL_SPEC, anchor)))
            .collect();
        Self { links }
    }

    /// An empty table.
    pub fn empty() -> Self {
        Self {
            links: HashMap::new(),
        }
    }

    /// Link for a bare type name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.links.insert(name.into(), url.into());
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Merge a `{"TypeName": "url"}` JSON file over the current table.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| DocError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read type links: {}", e),
        })?;

        let extra: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| DocError::Config {
                message: format!("Invalid type links file {}: {}", path.display(), e),
                help: Some("Expected a JSON object mapping type names to URLs".to_string()),
            })?;

        let count = extra.len();
        self.links.extend(extra);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_lookup() {
        let links = TypeLinks::builtin();

        assert_eq!(
            links.get("vec4"),
            Some("https://www.w3.org/TR/WGSL/#vector-types")
        );
        assert_eq!(
            links.get("texture_2d"),
            Some("https://www.w3.org/TR/WGSL/#sampled-texture-type")
        );
        assert_eq!(links.get("Mesh"), None);
    }

    #[test]
    fn test_extend_from_file_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(
            &path,
            r#"{"f32": "https://example.com/f32", "View": "https://example.com/view"}"#,
        )
        .unwrap();

        let mut links = TypeLinks::builtin();
        let added = links.extend_from_file(&path).unwrap();

        assert_eq!(added, 2);
        assert_eq!(links.get("f32"), Some("https://example.com/f32"));
        assert_eq!(links.get("View"), Some("https://example.com/view"));
    }

    #[test]
    fn test_extend_from_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = TypeLinks::empty().extend_from_file(&path).unwrap_err();

        assert!(matches!(err, DocError::Config { .. }));
    }
}
