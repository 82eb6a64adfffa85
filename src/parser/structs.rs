//! `struct` declarations.

use std::sync::OnceLock;

use regex::Regex;

use super::context::{Extractor, SourceContext};
use super::named::parse_named_types;
use crate::types::Structure;

fn struct_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bstruct\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{([^}]*)\}")
            .expect("struct regex must compile")
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StructExtractor;

impl Extractor for StructExtractor {
    type Record = Structure;

    fn extract(&self, ctx: &SourceContext<'_>) -> Vec<Structure> {
        struct_regex()
            .captures_iter(&ctx.code)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(2)?;
                let line_number = ctx.line_of(whole.start());

                Some(Structure {
                    name: caps[1].to_string(),
                    fields: parse_named_types(body.as_str(), body.start(), ctx),
                    line_number,
                    comment: ctx.comment_at(line_number),
                    context: ctx.defs_at(line_number),
                    annotations: Vec::new(),
                })
            })
            .collect()
    }
}
