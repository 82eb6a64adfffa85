//! Conditional-compilation (`#ifdef`) block tracking.
//!
//! Blocks pair up by directive order alone: an `#endif` always closes the
//! innermost open block, whatever name it was opened with.

use serde::Serialize;

use super::comments::blank_comments;
use super::{ParseWarning, WarningKind};

/// The directive that opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    Ifdef,
    Ifndef,
    If,
}

impl Directive {
    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Ifdef => "#ifdef",
            Directive::Ifndef => "#ifndef",
            Directive::If => "#if",
        }
    }
}

/// A closed `#ifdef ... [#else ...] #endif` range. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaderDefBlock {
    pub def_name: String,
    pub directive: Directive,
    pub ifdef_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_line: Option<usize>,
    pub endif_line: usize,
}

impl ShaderDefBlock {
    /// Last line (exclusive) of the `if` branch.
    fn if_branch_end(&self) -> usize {
        self.else_line.unwrap_or(self.endif_line)
    }
}

/// Which side of a block a line sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    If,
    Else,
}

/// One enclosing branch of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefResult {
    pub def_name: String,
    pub branch: Branch,
    /// Line of the directive that opened this branch.
    pub line_number: usize,
}

/// All closed blocks of one file, sorted by opening line.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefIndex {
    blocks: Vec<ShaderDefBlock>,
}

impl ShaderDefIndex {
    /// Scan `source` for directive lines. Directives inside comments are
    /// ignored.
    ///
    /// Unclosed blocks and stray `#else`/`#endif` lines are reported as
    /// warnings and otherwise ignored.
    pub fn scan(source: &str) -> (Self, Vec<ParseWarning>) {
        let mut blocks = Vec::new();
        let mut stack: Vec<ShaderDefBlock> = Vec::new();
        let mut warnings = Vec::new();

        let code = blank_comments(source);

        for (idx, line) in code.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if !trimmed.starts_with('#') {
                continue;
            }

            let mut words = trimmed.splitn(2, char::is_whitespace);
            let keyword = words.next().unwrap_or_default();
            let rest = words.next().unwrap_or_default().trim();

            let directive = match keyword {
                "#ifdef" => Some(Directive::Ifdef),
                "#ifndef" => Some(Directive::Ifndef),
                "#if" => Some(Directive::If),
                _ => None,
            };

            if let Some(directive) = directive {
                stack.push(ShaderDefBlock {
                    def_name: rest.to_string(),
                    directive,
                    ifdef_line: line_number,
                    else_line: None,
                    endif_line: 0,
                });
                continue;
            }

            match keyword {
                "#else" => match stack.last_mut() {
                    Some(open) => {
                        if open.else_line.is_none() {
                            open.else_line = Some(line_number);
                        }
                    }
                    None => warnings.push(ParseWarning::new(
                        WarningKind::ShaderDef,
                        line_number,
                        "`#else` without an open `#ifdef`",
                    )),
                },
                "#endif" => match stack.pop() {
                    Some(mut open) => {
                        open.endif_line = line_number;
                        blocks.push(open);
                    }
                    None => warnings.push(ParseWarning::new(
                        WarningKind::ShaderDef,
                        line_number,
                        "`#endif` without an open `#ifdef`",
                    )),
                },
                _ => {}
            }
        }

        for open in stack {
            warnings.push(ParseWarning::new(
                WarningKind::ShaderDef,
                open.ifdef_line,
                format!(
                    "`{}` block for '{}' is never closed",
                    open.directive.keyword(),
                    open.def_name
                ),
            ));
        }

        blocks.sort_by_key(|block| block.ifdef_line);
        (Self { blocks }, warnings)
    }

    pub fn blocks(&self) -> &[ShaderDefBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every branch covering `line`, outermost first.
    ///
    /// A line covers a branch when it sits strictly between the branch's
    /// opening directive and the directive that ends it.
    pub fn at_line(&self, line: usize) -> Vec<DefResult> {
        let mut results = Vec::new();

        for block in &self.blocks {
            if line > block.ifdef_line && line < block.if_branch_end() {
                results.push(DefResult {
                    def_name: block.def_name.clone(),
                    branch: Branch::If,
                    line_number: block.ifdef_line,
                });
            }

            if let Some(else_line) = block.else_line {
                if line > else_line && line < block.endif_line {
                    results.push(DefResult {
                        def_name: block.def_name.clone(),
                        branch: Branch::Else,
                        line_number: else_line,
                    });
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NESTED: &str = "\
#ifdef A
a
#ifdef B
ab
#else
a_not_b
#endif
#else
not_a
#endif
#ifdef C
c
#endif
";

    #[test]
    fn test_nested_blocks_sorted_by_start() {
        let (index, warnings) = ShaderDefIndex::scan(NESTED);

        assert!(warnings.is_empty());
        let spans: Vec<_> = index
            .blocks()
            .iter()
            .map(|b| (b.def_name.as_str(), b.ifdef_line, b.else_line, b.endif_line))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("A", 1, Some(8), 10),
                ("B", 3, Some(5), 7),
                ("C", 11, None, 13),
            ]
        );
    }

    #[test]
    fn test_block_ordering_invariant() {
        let (index, _) = ShaderDefIndex::scan(NESTED);

        for block in index.blocks() {
            let end = block.else_line.unwrap_or(block.endif_line);
            assert!(block.ifdef_line < end);
            assert!(end <= block.endif_line);
        }
        assert!(index
            .blocks()
            .windows(2)
            .all(|w| w[0].ifdef_line <= w[1].ifdef_line));
    }

    #[test]
    fn test_lookup_reports_all_covering_branches() {
        let (index, _) = ShaderDefIndex::scan(NESTED);

        let at = |line| -> Vec<(String, Branch)> {
            index
                .at_line(line)
                .into_iter()
                .map(|r| (r.def_name, r.branch))
                .collect()
        };

        assert_eq!(at(2), vec![("A".to_string(), Branch::If)]);
        assert_eq!(
            at(4),
            vec![("A".to_string(), Branch::If), ("B".to_string(), Branch::If)]
        );
        assert_eq!(
            at(6),
            vec![("A".to_string(), Branch::If), ("B".to_string(), Branch::Else)]
        );
        assert_eq!(at(9), vec![("A".to_string(), Branch::Else)]);
        assert_eq!(at(12), vec![("C".to_string(), Branch::If)]);
    }

    #[test]
    fn test_directive_lines_are_not_covered() {
        let (index, _) = ShaderDefIndex::scan(NESTED);

        assert!(index.at_line(1).is_empty());
        assert!(index.at_line(10).is_empty());
        assert!(index.at_line(8).is_empty());
    }

    #[test]
    fn test_branch_line_numbers() {
        let (index, _) = ShaderDefIndex::scan(NESTED);

        let results = index.at_line(6);
        assert_eq!(results[0].line_number, 1);
        assert_eq!(results[1].line_number, 5);
    }

    #[test]
    fn test_endif_closes_innermost_regardless_of_name() {
        let source = "#ifdef OUTER\n#ifdef INNER\nx\n#endif // OUTER\ny\n#endif\n";
        let (index, _) = ShaderDefIndex::scan(source);

        assert_eq!(index.blocks()[0].endif_line, 6);
        assert_eq!(index.blocks()[1].def_name, "INNER");
        assert_eq!(index.blocks()[1].endif_line, 4);
    }

    #[test]
    fn test_second_else_is_ignored() {
        let source = "#ifdef A\n#else\n#else\n#endif\n";
        let (index, warnings) = ShaderDefIndex::scan(source);

        assert!(warnings.is_empty());
        assert_eq!(index.blocks()[0].else_line, Some(2));
    }

    #[test]
    fn test_ifndef_and_if_open_blocks() {
        let source = "#ifndef SKINNED\nx\n#endif\n#if MAX_LIGHTS > 4\ny\n#endif\n";
        let (index, _) = ShaderDefIndex::scan(source);

        assert_eq!(index.blocks()[0].directive, Directive::Ifndef);
        assert_eq!(index.blocks()[0].def_name, "SKINNED");
        assert_eq!(index.blocks()[1].directive, Directive::If);
        assert_eq!(index.blocks()[1].def_name, "MAX_LIGHTS > 4");
    }

    #[test]
    fn test_else_ifdef_chain_marks_else_once() {
        let source = "#ifdef A\na\n#else ifdef B\nb\n#else\nc\n#endif\n";
        let (index, _) = ShaderDefIndex::scan(source);

        assert_eq!(index.blocks().len(), 1);
        assert_eq!(index.blocks()[0].else_line, Some(3));
        assert_eq!(index.at_line(6)[0].branch, Branch::Else);
    }

    #[test]
    fn test_malformed_nesting_warns() {
        let source = "#endif\n#else\n#ifdef OPEN\nx\n";
        let (index, warnings) = ShaderDefIndex::scan(source);

        assert!(index.is_empty());
        let lines: Vec<usize> = warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert!(warnings[2].message.contains("OPEN"));
    }

    #[test]
    fn test_similar_prefix_is_not_a_directive() {
        let (index, _) = ShaderDefIndex::scan("#ifdefined X\n#endif_marker\n");

        assert!(index.is_empty());
    }

    #[test]
    fn test_directives_in_comments_are_ignored() {
        let source = "/*\n#ifdef OLD\n*/\n#ifdef NEW\nx\n#endif\n// #endif\n";
        let (index, warnings) = ShaderDefIndex::scan(source);

        assert!(warnings.is_empty());
        assert_eq!(index.blocks().len(), 1);
        assert_eq!(index.blocks()[0].def_name, "NEW");
        assert_eq!(index.at_line(5)[0].line_number, 4);
    }
}
