//! Attribute runs and `name: type` lists shared by struct fields and
//! function parameters.

use std::sync::OnceLock;

use regex::Regex;

use super::context::{squash_whitespace, SourceContext};
use crate::types::{Annotation, NamedType, TypeInfo};

fn leading_annotation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*@([A-Za-z_][A-Za-z0-9_]*)(?:\s*\(([^)]*)\))?")
            .expect("annotation regex must compile")
    })
}

/// Parse the `@name(value)` attributes at the start of `text`.
///
/// Returns the annotations and the byte length consumed.
pub fn parse_leading_annotations(text: &str) -> (Vec<Annotation>, usize) {
    let mut annotations = Vec::new();
    let mut consumed = 0;

    while let Some(caps) = leading_annotation_regex().captures(&text[consumed..]) {
        let value = caps.get(2).map(|m| squash_whitespace(m.as_str())).unwrap_or_default();
        annotations.push(Annotation::new(&caps[1], value));
        consumed += caps[0].len();
    }

    (annotations, consumed)
}

/// Split on commas that are not nested inside `<...>` or `(...)`.
///
/// Yields each non-blank piece with its byte offset in `text`.
pub fn split_top_level(text: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push((start, &text[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &text[start..]));

    pieces
        .into_iter()
        .filter(|(_, piece)| !piece.trim().is_empty())
        .collect()
}

/// Replace preprocessor directive lines with spaces so they never leak into
/// field or parameter text.
fn blank_directive_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                " ".repeat(line.len())
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a field or parameter list that starts at `base_offset` in the
/// context's code.
pub fn parse_named_types(list: &str, base_offset: usize, ctx: &SourceContext<'_>) -> Vec<NamedType> {
    let cleaned = blank_directive_lines(list);

    split_top_level(&cleaned)
        .into_iter()
        .filter_map(|(offset, piece)| {
            let leading_ws = piece.len() - piece.trim_start().len();
            let (annotations, consumed) = parse_leading_annotations(piece);
            let (name, ty) = piece[consumed..].split_once(':')?;

            let name = name.trim();
            if name.is_empty() || ty.trim().is_empty() {
                return None;
            }

            let line_number = ctx.line_of(base_offset + offset + leading_ws);
            Some(NamedType {
                annotations,
                name: name.to_string(),
                type_info: TypeInfo::from_source(&squash_whitespace(ty)),
                context: ctx.defs_at(line_number),
                line_number,
            })
        })
        .collect()
}
