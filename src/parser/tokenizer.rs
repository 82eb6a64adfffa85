//! Tokenizer for `#import` statements.
//!
//! Produces a flat stream of identifier runs and single-character "other"
//! tokens. Identifier runs absorb `::` pairs and quoted spans, so
//! `"shaders/util.wgsl"::{a}` yields the identifier `shaders/util.wgsl::`
//! followed by `{`, `a` and `}`.

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Other,
    Whitespace,
}

/// A lexical token with its text and byte position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    /// Check for an "other" token with the given character.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Other && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    /// Check for an identifier token with the given text.
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }
}

/// Tokenize `src` in a single pass.
///
/// Whitespace runs are emitted as `Whitespace` tokens only when
/// `emit_whitespace` is set. The tokenizer is total: every input yields a
/// token stream, and malformed constructs surface in the import parser.
pub fn tokenize(src: &str, emit_whitespace: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<(Run, usize, String)> = None;
    let mut quoted = false;
    let mut chars = src.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '"' {
            quoted = !quoted;
            continue;
        }

        if let Some((run, start, mut text)) = current.take() {
            match run {
                Run::Identifier => {
                    if quoted || is_ident_continue(c) {
                        text.push(c);
                        current = Some((run, start, text));
                        continue;
                    }
                    if c == ':' && chars.peek().map(|&(_, n)| n) == Some(':') {
                        chars.next();
                        text.push_str("::");
                        current = Some((run, start, text));
                        continue;
                    }
                }
                Run::Whitespace => {
                    if c.is_whitespace() {
                        text.push(c);
                        current = Some((run, start, text));
                        continue;
                    }
                }
            }
            tokens.push(Token::new(run.kind(), text, start));
        }

        if quoted || is_ident_start(c) {
            current = Some((Run::Identifier, i, c.to_string()));
        } else if !c.is_whitespace() {
            tokens.push(Token::new(TokenKind::Other, c.to_string(), i));
        } else if emit_whitespace {
            current = Some((Run::Whitespace, i, c.to_string()));
        }
    }

    if let Some((run, start, text)) = current {
        tokens.push(Token::new(run.kind(), text, start));
    }

    tokens
}

/// A multi-character token being accumulated.
#[derive(Clone, Copy)]
enum Run {
    Identifier,
    Whitespace,
}

impl Run {
    fn kind(self) -> TokenKind {
        match self {
            Run::Identifier => TokenKind::Identifier,
            Run::Whitespace => TokenKind::Whitespace,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Cursor over a token stream with one token of lookahead.
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_simple_import() {
        let tokens = tokenize("#import foo::bar", false);

        assert_eq!(texts(&tokens), vec!["#", "import", "foo::bar"]);
        assert_eq!(tokens[0].kind, TokenKind::Other);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].pos, 8);
    }

    #[test]
    fn test_trailing_path_separator_joins_identifier() {
        let tokens = tokenize("foo::bar::{baz, qux as q};", false);

        assert_eq!(
            texts(&tokens),
            vec!["foo::bar::", "{", "baz", ",", "qux", "as", "q", "}", ";"]
        );
    }

    #[test]
    fn test_single_colon_is_other() {
        let tokens = tokenize("a: b", false);

        assert_eq!(texts(&tokens), vec!["a", ":", "b"]);
        assert_eq!(tokens[1].kind, TokenKind::Other);
    }

    #[test]
    fn test_quoted_span_is_one_identifier() {
        let tokens = tokenize(r#"#import "shaders/my util.wgsl"::X"#, false);

        assert_eq!(texts(&tokens), vec!["#", "import", "shaders/my util.wgsl::X"]);
        assert_eq!(tokens[2].pos, 9);
    }

    #[test]
    fn test_whitespace_emission() {
        let tokens = tokenize("a  b", true);

        assert_eq!(texts(&tokens), vec!["a", "  ", "b"]);
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);

        let tokens = tokenize("a  b", false);
        assert_eq!(texts(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn test_lossless_over_non_whitespace() {
        let src = "#import a::b::{c as d,\te}; ";
        let tokens = tokenize(src, true);

        let rejoined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rejoined, src);

        for token in &tokens {
            assert_eq!(&src[token.pos..token.pos + token.text.len()], token.text);
        }
    }

    #[test]
    fn test_unicode_identifiers() {
        let tokens = tokenize("größe::wert", false);

        assert_eq!(texts(&tokens), vec!["größe::wert"]);
    }

    #[test]
    fn test_cursor_peek_and_next() {
        let mut cursor = TokenCursor::new(tokenize("a , b", false));

        assert!(cursor.peek().unwrap().is_ident("a"));
        assert!(cursor.next().unwrap().is_ident("a"));
        assert!(cursor.next().unwrap().is_punct(','));
        assert!(cursor.next().unwrap().is_ident("b"));
        assert!(cursor.next().is_none());
        assert!(cursor.peek().is_none());
    }
}
