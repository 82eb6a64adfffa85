//! Documentation model for WGSL files.
//!
//! - `TypeInfo` - a type reference and its resolved link
//! - `Const`, `Structure`, `Function`, `Binding` - declaration records
//! - `ParsedFile` - everything extracted from one file

mod decl;
mod file;
mod type_info;

pub use decl::{
    any_conditional, Binding, Const, DefContext, Function, HasConditionalContext, NamedType,
    Stage, Structure,
};
pub use file::{normalize_link, FileMeta, ParsedFile};
pub use type_info::{bare_type_name, strip_path, Annotation, TypeInfo};
