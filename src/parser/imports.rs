//! `#import` statement extraction and parsing.
//!
//! A statement may span several physical lines when it uses grouped
//! imports:
//!
//! ```text
//! #import bevy_pbr::{
//!     mesh_view_bindings::view,
//!     utils::{PI, coords_to_viewport_uv as to_uv},
//! }
//! ```
//!
//! Parsing keeps an explicit stack of path prefixes, one frame per open
//! `{`, and records every leaf under the name it is usable by in the file.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::comments::blank_comments;
use super::tokenizer::{tokenize, TokenCursor, TokenKind};

/// Locally usable name -> fully qualified paths, in first-declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeclaredImports(BTreeMap<String, Vec<String>>);

impl DeclaredImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as usable under `name`.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(path.into());
    }

    /// All paths declared for a name.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// The first path declared for a name.
    pub fn first_path(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|paths| paths.first()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every entry of `other`, keeping existing paths first.
    pub fn merge(&mut self, other: DeclaredImports) {
        for (name, paths) in other.0 {
            self.0.entry(name).or_default().extend(paths);
        }
    }
}

/// What went wrong in an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportErrorKind {
    ExpectedImport,
    ExpectedAlias,
    BraceWithoutPath,
    UnmatchedCloseBrace,
    TokenAfterSemicolon,
    UnexpectedToken(String),
    IncompletePath,
}

/// A malformed `#import` statement, with the byte offset of the offending
/// token inside the statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at position {offset}", describe(.kind))]
pub struct ImportError {
    pub kind: ImportErrorKind,
    pub offset: usize,
    /// The statement that failed, as reassembled from the source lines.
    pub statement: String,
}

fn describe(kind: &ImportErrorKind) -> String {
    match kind {
        ImportErrorKind::ExpectedImport => "expected `#import`".to_string(),
        ImportErrorKind::ExpectedAlias => "expected identifier after `as`".to_string(),
        ImportErrorKind::BraceWithoutPath => "open brace must follow `::`".to_string(),
        ImportErrorKind::UnmatchedCloseBrace => "close brace without open".to_string(),
        ImportErrorKind::TokenAfterSemicolon => "unexpected token after `;`".to_string(),
        ImportErrorKind::UnexpectedToken(text) => format!("unexpected token `{}`", text),
        ImportErrorKind::IncompletePath => "import path ends with `::`".to_string(),
    }
}

/// Result of parsing one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    pub imports: DeclaredImports,
    /// Groups still open when the statement ended.
    pub unclosed_groups: usize,
}

/// Find every logical `#import` statement in source order.
///
/// Continuation lines are appended while the statement's brace depth stays
/// positive. Each physical line is trimmed and stripped of `//` comments;
/// lines are joined with a single space.
pub fn extract_import_blocks(source: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut buffer = String::new();
    let mut depth: i64 = 0;

    for line in source.lines() {
        let trimmed = strip_line_comment(line).trim();

        if is_import_line(trimmed) {
            if !buffer.is_empty() {
                blocks.push(std::mem::take(&mut buffer));
            }
            buffer.push_str(trimmed);
            depth = brace_delta(trimmed);

            if depth <= 0 {
                blocks.push(std::mem::take(&mut buffer));
                depth = 0;
            }
            continue;
        }

        if depth > 0 {
            depth += brace_delta(trimmed);
            if !trimmed.is_empty() {
                buffer.push(' ');
                buffer.push_str(trimmed);
            }

            if depth <= 0 {
                blocks.push(std::mem::take(&mut buffer));
                depth = 0;
            }
        }
    }

    if !buffer.is_empty() {
        blocks.push(buffer);
    }

    blocks
}

fn is_import_line(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("#import")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Parse one logical `#import` statement.
pub fn parse_import_statement(statement: &str) -> Result<ParsedImport, ImportError> {
    let fail = |kind: ImportErrorKind, offset: usize| ImportError {
        kind,
        offset,
        statement: statement.to_string(),
    };

    let mut tokens = TokenCursor::new(tokenize(statement, false));

    match tokens.next() {
        Some(tok) if tok.is_punct('#') => {}
        Some(tok) => return Err(fail(ImportErrorKind::ExpectedImport, tok.pos)),
        None => return Err(fail(ImportErrorKind::ExpectedImport, statement.len())),
    }
    match tokens.next() {
        Some(tok) if tok.is_ident("import") => {}
        Some(tok) => return Err(fail(ImportErrorKind::ExpectedImport, tok.pos)),
        None => return Err(fail(ImportErrorKind::ExpectedImport, statement.len())),
    }

    let mut scope = ImportScope::default();

    while let Some(tok) = tokens.next().cloned() {
        match tok.kind {
            TokenKind::Identifier => {
                scope.current.push_str(&tok.text);

                let follows_ident = matches!(
                    tokens.peek(),
                    Some(next) if next.kind == TokenKind::Identifier
                );
                if !follows_ident {
                    continue;
                }

                if tokens.peek().is_some_and(|next| next.is_ident("as")) {
                    let as_pos = tokens.next().map(|t| t.pos).unwrap_or(tok.pos);
                    match tokens.next() {
                        Some(alias) if alias.kind == TokenKind::Identifier => {
                            scope.alias = Some(alias.text.clone());
                        }
                        _ => return Err(fail(ImportErrorKind::ExpectedAlias, as_pos)),
                    }
                    // An alias ends the item; only punctuation may follow.
                    if let Some(next) = tokens.peek() {
                        if next.kind == TokenKind::Identifier {
                            return Err(fail(
                                ImportErrorKind::UnexpectedToken(next.text.clone()),
                                next.pos,
                            ));
                        }
                    }
                } else {
                    // Two identifiers in a row: treat the first as a path segment.
                    let segment = format!("{}::", std::mem::take(&mut scope.current));
                    scope.prefixes.push(segment);
                    scope.alias = None;
                }
            }
            TokenKind::Other if tok.is_punct('{') => {
                if !scope.current.ends_with("::") {
                    return Err(fail(ImportErrorKind::BraceWithoutPath, tok.pos));
                }
                scope.prefixes.push(std::mem::take(&mut scope.current));
                scope.alias = None;
            }
            TokenKind::Other if tok.is_punct(',') || tok.is_punct('}') => {
                scope
                    .flush()
                    .map_err(|kind| fail(kind, tok.pos))?;

                if tok.is_punct('}') && scope.prefixes.pop().is_none() {
                    return Err(fail(ImportErrorKind::UnmatchedCloseBrace, tok.pos));
                }
            }
            TokenKind::Other if tok.is_punct(';') => {
                if let Some(next) = tokens.peek() {
                    return Err(fail(ImportErrorKind::TokenAfterSemicolon, next.pos));
                }
            }
            TokenKind::Other | TokenKind::Whitespace => {
                return Err(fail(ImportErrorKind::UnexpectedToken(tok.text), tok.pos));
            }
        }
    }

    scope
        .flush()
        .map_err(|kind| fail(kind, statement.len()))?;

    Ok(ParsedImport {
        unclosed_groups: scope.prefixes.len(),
        imports: scope.imports,
    })
}

/// Mutable parser state: the prefix stack plus the pending leaf.
#[derive(Default)]
struct ImportScope {
    prefixes: Vec<String>,
    current: String,
    alias: Option<String>,
    imports: DeclaredImports,
}

impl ImportScope {
    /// Record the pending leaf, if any, and reset it.
    fn flush(&mut self) -> Result<(), ImportErrorKind> {
        if self.current.is_empty() {
            return Ok(());
        }

        let current = std::mem::take(&mut self.current);
        let used_name = match self.alias.take() {
            Some(alias) => alias,
            None => current.rsplit("::").next().unwrap_or(&current).to_string(),
        };
        if used_name.is_empty() {
            return Err(ImportErrorKind::IncompletePath);
        }

        let full_path = format!("{}{}", self.prefixes.concat(), current);
        self.imports.insert(used_name, full_path);
        Ok(())
    }
}

/// Extract and merge the imports of every statement in a file.
///
/// Returns the merged imports and the number of groups left unterminated.
/// Statements inside comments are ignored.
pub fn extract_all_imports(source: &str) -> Result<ParsedImport, ImportError> {
    let mut merged = ParsedImport::default();

    for block in extract_import_blocks(&blank_comments(source)) {
        let parsed = parse_import_statement(&block)?;
        merged.imports.merge(parsed.imports);
        merged.unclosed_groups += parsed.unclosed_groups;
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(statement: &str) -> DeclaredImports {
        parse_import_statement(statement).unwrap().imports
    }

    #[test]
    fn test_grouped_import_with_alias() {
        let imports = parse("#import foo::bar::{baz, qux as q};");

        insta::assert_json_snapshot!(imports, @r###"
        {
          "baz": [
            "foo::bar::baz"
          ],
          "q": [
            "foo::bar::qux"
          ]
        }
        "###);
    }

    #[test]
    fn test_single_leaf_import() {
        let imports = parse("#import bevy_pbr::mesh_functions");

        assert_eq!(
            imports.get("mesh_functions"),
            Some(&["bevy_pbr::mesh_functions".to_string()][..])
        );
    }

    #[test]
    fn test_aliased_leaf_without_group() {
        let imports = parse("#import bevy_render::maths::PI as MATH_PI");

        assert_eq!(imports.first_path("MATH_PI"), Some("bevy_render::maths::PI"));
        assert!(imports.get("PI").is_none());
    }

    #[test]
    fn test_nested_groups() {
        let imports = parse(
            "#import bevy_pbr::{ mesh_view_bindings::view, utils::{PI, coords_to_viewport_uv as to_uv}, }",
        );

        assert_eq!(imports.first_path("view"), Some("bevy_pbr::mesh_view_bindings::view"));
        assert_eq!(imports.first_path("PI"), Some("bevy_pbr::utils::PI"));
        assert_eq!(
            imports.first_path("to_uv"),
            Some("bevy_pbr::utils::coords_to_viewport_uv")
        );
        assert_eq!(imports.len(), 3);
    }

    #[test]
    fn test_comma_separated_top_level_paths() {
        let imports = parse("#import a::b, c::d::e");

        assert_eq!(imports.first_path("b"), Some("a::b"));
        assert_eq!(imports.first_path("e"), Some("c::d::e"));
    }

    #[test]
    fn test_quoted_module_path() {
        let imports = parse(r#"#import "shaders/custom.wgsl"::COLOR"#);

        assert_eq!(imports.first_path("COLOR"), Some("shaders/custom.wgsl::COLOR"));
    }

    #[test]
    fn test_redundant_imports_keep_order() {
        let imports = parse("#import a::X, b::X");

        assert_eq!(
            imports.get("X"),
            Some(&["a::X".to_string(), "b::X".to_string()][..])
        );
    }

    #[test]
    fn test_missing_import_keyword() {
        let err = parse_import_statement("#include foo").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::ExpectedImport);
        assert_eq!(err.offset, 1);
        assert_eq!(err.to_string(), "expected `#import` at position 1");
    }

    #[test]
    fn test_brace_must_follow_path_separator() {
        let err = parse_import_statement("#import foo{bar}").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::BraceWithoutPath);
        assert_eq!(err.offset, 11);
    }

    #[test]
    fn test_close_brace_without_open() {
        let err = parse_import_statement("#import foo::bar}").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::UnmatchedCloseBrace);
        assert_eq!(err.offset, 16);
    }

    #[test]
    fn test_token_after_semicolon() {
        let err = parse_import_statement("#import foo::bar; baz").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::TokenAfterSemicolon);
        assert_eq!(err.offset, 18);
    }

    #[test]
    fn test_unexpected_token() {
        let err = parse_import_statement("#import foo::bar::{a * b}").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::UnexpectedToken("*".to_string()));
        assert_eq!(err.offset, 21);
    }

    #[test]
    fn test_alias_requires_identifier() {
        let err = parse_import_statement("#import foo::bar as ;").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::ExpectedAlias);
        assert_eq!(err.offset, 17);
    }

    #[test]
    fn test_identifier_after_alias_is_rejected() {
        for statement in ["#import a::b as c d", "#import a::{b as c d}"] {
            let err = parse_import_statement(statement).unwrap_err();

            assert_eq!(err.kind, ImportErrorKind::UnexpectedToken("d".to_string()));
            assert_eq!(err.offset, statement.find(" d").unwrap() + 1);
        }
    }

    #[test]
    fn test_dangling_path_separator() {
        let err = parse_import_statement("#import foo::;").unwrap_err();

        assert_eq!(err.kind, ImportErrorKind::IncompletePath);
    }

    #[test]
    fn test_unterminated_group_is_tolerated() {
        let parsed = parse_import_statement("#import foo::{a, b").unwrap();

        assert_eq!(parsed.unclosed_groups, 1);
        assert_eq!(parsed.imports.first_path("b"), Some("foo::b"));
    }

    #[test]
    fn test_keys_non_empty_and_paths_well_formed() {
        let statements = [
            "#import a::{b, c::{d, e as f}, g}",
            "#import x::y::z;",
            "#import m::{n as o, p}",
        ];

        for statement in statements {
            for (name, paths) in parse(statement).iter() {
                assert!(!name.is_empty());
                for path in paths {
                    assert!(path.split("::").all(|segment| !segment.is_empty()), "{path}");
                }
            }
        }
    }

    #[test]
    fn test_extract_multiline_blocks() {
        let source = "\
#define_import_path my::module

#import bevy_pbr::{
    mesh_view_bindings::view, // the view
    utils::{
        PI,
    },
}
#import other::thing

fn main() {}
";
        let blocks = extract_import_blocks(source);

        assert_eq!(
            blocks,
            vec![
                "#import bevy_pbr::{ mesh_view_bindings::view, utils::{ PI, }, }".to_string(),
                "#import other::thing".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_all_imports_merges_statements() {
        let source = "#import a::{X, Y}\n#import b::X\n";

        let parsed = extract_all_imports(source).unwrap();

        assert_eq!(
            parsed.imports.get("X"),
            Some(&["a::X".to_string(), "b::X".to_string()][..])
        );
        assert_eq!(parsed.imports.first_path("Y"), Some("a::Y"));
    }

    #[test]
    fn test_unterminated_block_at_end_of_file() {
        let blocks = extract_import_blocks("const A = 1;\n#import a::{\n    b,\n");

        assert_eq!(blocks, vec!["#import a::{ b,".to_string()]);
    }

    #[test]
    fn test_non_import_directive_is_ignored() {
        assert!(extract_import_blocks("#importer foo\n#ifdef X\n").is_empty());
    }

    #[test]
    fn test_commented_out_imports_are_skipped() {
        let source = "/*\n#import broken::{{\n*/\n// #import also::broken}}\n#import a::B\nconst A = 1;\n";

        let parsed = extract_all_imports(source).unwrap();

        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports.first_path("B"), Some("a::B"));
    }
}
