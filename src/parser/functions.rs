//! `fn` declarations, including entry point attributes.

use std::sync::OnceLock;

use regex::Regex;

use super::context::{squash_whitespace, Extractor, SourceContext};
use super::named::{parse_leading_annotations, parse_named_types};
use crate::types::{Annotation, Function, Stage, TypeInfo};

fn function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"((?:@[A-Za-z_][A-Za-z0-9_]*(?:\s*\([^)]*\))?\s*)*)",
            r"\bfn\s+([A-Za-z_][A-Za-z0-9_]*)\s*",
            r"\(((?:[^()]|\([^()]*\))*)\)\s*",
            r"(?:->\s*([^{]*?))?\s*\{",
        ))
        .expect("function regex must compile")
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionExtractor;

impl Extractor for FunctionExtractor {
    type Record = Function;

    fn extract(&self, ctx: &SourceContext<'_>) -> Vec<Function> {
        function_regex()
            .captures_iter(&ctx.code)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let params = caps.get(3)?;
                let line_number = ctx.line_of(whole.start());

                let (annotations, _) = parse_leading_annotations(&caps[1]);
                let stage_attribute = annotations
                    .iter()
                    .find_map(|a| Stage::from_attribute(&a.name));
                let workgroup_size = workgroup_size(&annotations);

                let return_type = caps.get(4).and_then(|m| parse_return_type(m.as_str()));

                Some(Function {
                    stage_attribute,
                    workgroup_size,
                    name: caps[2].to_string(),
                    line_number,
                    params: parse_named_types(params.as_str(), params.start(), ctx),
                    return_type,
                    comment: ctx.comment_at(line_number),
                    context: ctx.defs_at(line_number),
                    annotations,
                })
            })
            .collect()
    }
}

fn workgroup_size(annotations: &[Annotation]) -> Vec<String> {
    annotations
        .iter()
        .find(|a| a.name == "workgroup_size")
        .map(|a| {
            a.value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `@location(0) vec4<f32>` -> type `vec4<f32>` with one annotation.
fn parse_return_type(text: &str) -> Option<TypeInfo> {
    let (annotations, consumed) = parse_leading_annotations(text);
    let ty = squash_whitespace(&text[consumed..]);
    if ty.is_empty() {
        return None;
    }
    Some(TypeInfo::from_source(&ty).with_annotations(annotations))
}
