//! Resource bindings: `@group(G) @binding(B) var<...> name: Type;`

use std::sync::OnceLock;

use regex::Regex;

use super::context::{squash_whitespace, Extractor, SourceContext};
use crate::types::{Annotation, Binding, TypeInfo};

fn binding_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"@group\(\s*(\d+)\s*\)\s*@binding\(\s*(\d+)\s*\)\s*",
            r"var\s*(?:<([^>]*)>)?\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([^;]+?)\s*;",
        ))
        .expect("binding regex must compile")
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BindingExtractor;

impl Extractor for BindingExtractor {
    type Record = Binding;

    fn extract(&self, ctx: &SourceContext<'_>) -> Vec<Binding> {
        binding_regex()
            .captures_iter(&ctx.code)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let line_number = ctx.line_of(whole.start());

                let binding_type = caps
                    .get(3)
                    .map(|m| squash_whitespace(m.as_str()))
                    .filter(|t| !t.is_empty());

                Some(Binding {
                    line_number,
                    name: caps[4].to_string(),
                    binding_type,
                    annotations: vec![
                        Annotation::new("group", &caps[1]),
                        Annotation::new("binding", &caps[2]),
                    ],
                    type_info: TypeInfo::from_source(&squash_whitespace(&caps[5])),
                    context: ctx.defs_at(line_number),
                    comment: ctx.comment_at(line_number),
                })
            })
            .collect()
    }
}
