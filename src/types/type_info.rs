//! Type references and attribute annotations.

use serde::Serialize;

/// A parsed attribute such as `@location(0)` or `@builtin(position)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub name: String,
    /// Argument text between the parentheses, empty for bare attributes.
    pub value: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A type reference and its resolved link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub annotations: Vec<Annotation>,
    /// Type text with the outer path qualifier removed.
    #[serde(rename = "type")]
    pub ty: String,
    /// Type text as written.
    pub full_type_path: String,
    /// Empty until resolution finds a target.
    pub type_link: String,
    /// The link points at another page.
    pub type_link_targets_new_context: bool,
}

impl TypeInfo {
    /// Build from the type text as written in source.
    pub fn from_source(raw: &str) -> Self {
        let raw = raw.trim();
        Self {
            ty: strip_path(raw).to_string(),
            full_type_path: raw.to_string(),
            ..Self::default()
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// The type name without qualifier or generic arguments.
    pub fn bare_name(&self) -> &str {
        bare_type_name(&self.ty)
    }

    pub fn is_resolved(&self) -> bool {
        !self.type_link.is_empty()
    }
}

/// Remove the `::` qualifier of the outermost type name.
///
/// `a::b::Foo<c::D>` becomes `Foo<c::D>`.
pub fn strip_path(ty: &str) -> &str {
    let ty = ty.trim();
    let head_end = ty.find('<').unwrap_or(ty.len());
    match ty[..head_end].rfind("::") {
        Some(idx) => &ty[idx + 2..],
        None => ty,
    }
}

/// The type name with qualifier and generic arguments removed.
pub fn bare_type_name(ty: &str) -> &str {
    let stripped = strip_path(ty);
    match stripped.find('<') {
        Some(idx) => stripped[..idx].trim_end(),
        None => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_path_outer_only() {
        assert_eq!(strip_path("a::b::Foo<c::D>"), "Foo<c::D>");
        assert_eq!(strip_path("  view::View "), "View");
        assert_eq!(strip_path("f32"), "f32");
        assert_eq!(strip_path("array<mesh::Mesh, 4>"), "array<mesh::Mesh, 4>");
    }

    #[test]
    fn test_bare_type_name() {
        assert_eq!(bare_type_name("a::b::Foo<c::D>"), "Foo");
        assert_eq!(bare_type_name("vec4<f32>"), "vec4");
        assert_eq!(bare_type_name("Light"), "Light");
    }

    #[test]
    fn test_from_source_keeps_full_path() {
        let info = TypeInfo::from_source(" bevy_pbr::mesh_types::Mesh ");

        assert_eq!(info.ty, "Mesh");
        assert_eq!(info.full_type_path, "bevy_pbr::mesh_types::Mesh");
        assert_eq!(info.bare_name(), "Mesh");
        assert!(!info.is_resolved());
    }
}
