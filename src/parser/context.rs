//! Shared per-file state handed to every declaration extractor.

use super::comments::{blank_comments, LineComments};
use super::shader_defs::ShaderDefIndex;
use super::span::LineIndex;
use super::ParseWarning;
use crate::types::DefContext;

/// Pre-scanned view of one source file.
#[derive(Debug)]
pub struct SourceContext<'a> {
    /// Original text.
    pub source: &'a str,
    /// Text with comments blanked to spaces; offsets match `source`.
    pub code: String,
    lines: LineIndex,
    comments: LineComments,
    shader_defs: ShaderDefIndex,
    /// Brace depth at the start of each line of `code`.
    line_depths: Vec<i64>,
}

impl<'a> SourceContext<'a> {
    pub fn new(source: &'a str) -> (Self, Vec<ParseWarning>) {
        let code = blank_comments(source);
        let (shader_defs, warnings) = ShaderDefIndex::scan(source);
        let line_depths = line_depths(&code);

        let context = Self {
            source,
            lines: LineIndex::new(source),
            comments: LineComments::scan(source),
            shader_defs,
            line_depths,
            code,
        };
        (context, warnings)
    }

    /// 1-based line of a byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    pub fn comment_at(&self, line: usize) -> String {
        self.comments.leading_comment(line)
    }

    pub fn defs_at(&self, line: usize) -> DefContext {
        DefContext::new(self.shader_defs.at_line(line))
    }

    /// Brace depth at the start of 1-based `line`.
    pub fn depth_at_line(&self, line: usize) -> i64 {
        self.line_depths
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or_default()
    }
}

/// Depth bookkeeping for one open `#ifdef` block.
struct BranchDepth {
    /// Depth at the opening directive.
    open: i64,
    /// Depth at the end of the `if` branch, once `#else` is seen.
    if_end: Option<i64>,
}

/// Brace depth per line. Each `#else` branch restarts from the depth at its
/// `#ifdef`, and `#endif` continues from the end of the `if` branch, so
/// alternative function headers count once.
fn line_depths(code: &str) -> Vec<i64> {
    let mut depths = Vec::new();
    let mut depth = 0i64;
    let mut blocks: Vec<BranchDepth> = Vec::new();

    for line in code.split('\n') {
        depths.push(depth);

        let keyword = line.split_whitespace().next().unwrap_or_default();
        match keyword {
            "#ifdef" | "#ifndef" | "#if" => {
                blocks.push(BranchDepth { open: depth, if_end: None });
                continue;
            }
            "#else" => {
                if let Some(block) = blocks.last_mut() {
                    if block.if_end.is_none() {
                        block.if_end = Some(depth);
                    }
                    depth = block.open;
                }
                continue;
            }
            "#endif" => {
                if let Some(block) = blocks.pop() {
                    if let Some(if_end) = block.if_end {
                        depth = if_end;
                    }
                }
                continue;
            }
            _ => {}
        }

        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth = (depth - 1).max(0),
                _ => {}
            }
        }
    }

    depths
}

/// One declaration kind's matcher.
pub trait Extractor {
    type Record;

    /// All records of this kind, in source order.
    fn extract(&self, ctx: &SourceContext<'_>) -> Vec<Self::Record>;
}

/// Collapse whitespace runs (including newlines) to single spaces.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_tracking() {
        let source = "const A = 1;\nfn f() {\n  const B = 2;\n}\nconst C = 3;\n";
        let (ctx, _) = SourceContext::new(source);

        assert_eq!(ctx.depth_at_line(1), 0);
        assert_eq!(ctx.depth_at_line(3), 1);
        assert_eq!(ctx.depth_at_line(5), 0);
    }

    #[test]
    fn test_commented_braces_do_not_count() {
        let source = "// {\nconst A = 1;\n";
        let (ctx, _) = SourceContext::new(source);

        assert_eq!(ctx.depth_at_line(2), 0);
    }

    #[test]
    fn test_alternative_headers_count_once() {
        let source = "\
#ifdef A
fn f() -> f32 {
#else
fn f() -> f16 {
#endif
    return 1.0;
}
const AFTER: u32 = 1u;
";
        let (ctx, _) = SourceContext::new(source);

        assert_eq!(ctx.depth_at_line(4), 0);
        assert_eq!(ctx.depth_at_line(6), 1);
        assert_eq!(ctx.depth_at_line(8), 0);
    }

    #[test]
    fn test_squash_whitespace() {
        assert_eq!(squash_whitespace("  array<f32,\n   4>  "), "array<f32, 4>");
    }
}
