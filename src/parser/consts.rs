//! Module-scope `const` declarations.

use std::sync::OnceLock;

use regex::Regex;

use super::context::{squash_whitespace, Extractor, SourceContext};
use crate::types::{Const, TypeInfo};

fn const_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*const\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([^=;]+?))?\s*=\s*([^;]+?)\s*;")
            .expect("const regex must compile")
    })
}

fn float_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+").expect("float regex must compile"))
}

fn vector_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"vec\d<[^>]*>").expect("vector regex must compile"))
}

fn unsigned_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+u$").expect("unsigned regex must compile"))
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").expect("integer regex must compile"))
}

/// Guess the type of an untyped constant from its value.
pub fn infer_type(value: &str) -> String {
    if float_regex().is_match(value) {
        "AbstractFloat".to_string()
    } else if let Some(vector) = vector_regex().find(value) {
        vector.as_str().to_string()
    } else if unsigned_regex().is_match(value) {
        "u32".to_string()
    } else if integer_regex().is_match(value) {
        "AbstractInt".to_string()
    } else {
        String::new()
    }
}

/// Extracts `const` declarations at brace depth zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstExtractor;

impl Extractor for ConstExtractor {
    type Record = Const;

    fn extract(&self, ctx: &SourceContext<'_>) -> Vec<Const> {
        const_regex()
            .captures_iter(&ctx.code)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                let line_number = ctx.line_of(name.start());
                if ctx.depth_at_line(line_number) != 0 {
                    return None;
                }

                let value = squash_whitespace(&caps[3]);
                let declared = caps.get(2).map(|m| squash_whitespace(m.as_str()));
                let ty = match declared {
                    Some(ty) if !ty.is_empty() => ty,
                    _ => infer_type(&value),
                };

                tracing::trace!(name = name.as_str(), offset = whole.start(), "const");
                Some(Const {
                    line_number,
                    name: name.as_str().to_string(),
                    comment: ctx.comment_at(line_number),
                    type_info: TypeInfo::from_source(&ty),
                    value,
                    context: ctx.defs_at(line_number),
                    annotations: Vec::new(),
                })
            })
            .collect()
    }
}
