//! Declaration records extracted from WGSL source.
//!
//! Every record carries its 1-based line number, the leading comment run and
//! the conditional-compilation branches enclosing it.

use serde::Serialize;

use super::{Annotation, TypeInfo};
use crate::parser::DefResult;

/// Conditional-compilation branches enclosing a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefContext {
    pub has_shader_defs: bool,
    pub shader_defs: Vec<DefResult>,
}

impl DefContext {
    pub fn new(shader_defs: Vec<DefResult>) -> Self {
        Self {
            has_shader_defs: !shader_defs.is_empty(),
            shader_defs,
        }
    }
}

/// Implemented by every record that can sit inside an `#ifdef` block.
pub trait HasConditionalContext {
    fn def_context(&self) -> &DefContext;

    fn has_conditional_context(&self) -> bool {
        self.def_context().has_shader_defs
    }
}

/// True if any item in the collection is conditionally compiled.
pub fn any_conditional<T: HasConditionalContext>(items: &[T]) -> bool {
    items.iter().any(HasConditionalContext::has_conditional_context)
}

macro_rules! impl_conditional {
    ($($record:ty),* $(,)?) => {
        $(impl HasConditionalContext for $record {
            fn def_context(&self) -> &DefContext {
                &self.context
            }
        })*
    };
}

impl_conditional!(Const, NamedType, Structure, Function, Binding);

/// A module-scope `const`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Const {
    pub line_number: usize,
    pub name: String,
    pub comment: String,
    pub type_info: TypeInfo,
    pub value: String,
    #[serde(flatten)]
    pub context: DefContext,
    pub annotations: Vec<Annotation>,
}

/// A struct field or function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedType {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_info: TypeInfo,
    #[serde(flatten)]
    pub context: DefContext,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub name: String,
    pub fields: Vec<NamedType>,
    pub line_number: usize,
    pub comment: String,
    #[serde(flatten)]
    pub context: DefContext,
    pub annotations: Vec<Annotation>,
}

impl Structure {
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn fields_have_shader_defs(&self) -> bool {
        any_conditional(&self.fields)
    }
}

/// Shader entry point stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Vertex,
    Fragment,
    Compute,
}

impl Stage {
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "vertex" => Some(Stage::Vertex),
            "fragment" => Some(Stage::Fragment),
            "compute" => Some(Stage::Compute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
            Stage::Compute => "compute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub stage_attribute: Option<Stage>,
    /// `@workgroup_size` arguments as written.
    pub workgroup_size: Vec<String>,
    pub name: String,
    pub line_number: usize,
    pub params: Vec<NamedType>,
    /// `None` for functions without `->`.
    pub return_type: Option<TypeInfo>,
    pub comment: String,
    #[serde(flatten)]
    pub context: DefContext,
    /// All attributes preceding `fn`.
    pub annotations: Vec<Annotation>,
}

impl Function {
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn has_workgroup_size(&self) -> bool {
        !self.workgroup_size.is_empty()
    }
}

/// A `@group(G) @binding(B) var` resource declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub line_number: usize,
    pub name: String,
    /// Address space and access mode, e.g. `storage, read_write`.
    pub binding_type: Option<String>,
    pub annotations: Vec<Annotation>,
    pub type_info: TypeInfo,
    #[serde(flatten)]
    pub context: DefContext,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Branch;

    fn field(name: &str, defs: Vec<DefResult>) -> NamedType {
        NamedType {
            annotations: Vec::new(),
            name: name.to_string(),
            type_info: TypeInfo::from_source("f32"),
            context: DefContext::new(defs),
            line_number: 1,
        }
    }

    #[test]
    fn test_any_conditional() {
        let plain = vec![field("a", vec![]), field("b", vec![])];
        assert!(!any_conditional(&plain));

        let gated = vec![
            field("a", vec![]),
            field(
                "b",
                vec![DefResult {
                    def_name: "FEATURE".to_string(),
                    branch: Branch::If,
                    line_number: 1,
                }],
            ),
        ];
        assert!(any_conditional(&gated));
    }

    #[test]
    fn test_stage_from_attribute() {
        assert_eq!(Stage::from_attribute("compute"), Some(Stage::Compute));
        assert_eq!(Stage::from_attribute("workgroup_size"), None);
        assert_eq!(Stage::Fragment.as_str(), "fragment");
    }
}
