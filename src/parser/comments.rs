//! Leading doc comments and comment blanking.

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    /// A comment line; `None` for lines that contribute no text (`// TODO:`).
    Comment(Option<String>),
    Blank,
    Code,
}

/// Per-line comment table for one file.
#[derive(Debug, Clone, Default)]
pub struct LineComments {
    lines: Vec<LineKind>,
}

impl LineComments {
    pub fn scan(source: &str) -> Self {
        let mut lines = Vec::new();
        let mut in_block = false;

        for line in source.lines() {
            let trimmed = line.trim();

            if in_block {
                let (body, closed) = match trimmed.find("*/") {
                    Some(end) => (&trimmed[..end], true),
                    None => (trimmed, false),
                };
                in_block = !closed;
                let text = body.trim_start_matches('*').trim();
                lines.push(LineKind::Comment(Some(text.to_string())));
                continue;
            }

            let kind = if trimmed.is_empty() {
                LineKind::Blank
            } else if trimmed.starts_with("// TODO:") {
                LineKind::Comment(None)
            } else if let Some(rest) = trimmed.strip_prefix("//") {
                let text = rest.trim_start_matches('/').trim();
                LineKind::Comment(Some(text.to_string()))
            } else if let Some(rest) = trimmed.strip_prefix("/*") {
                let rest = rest.trim_start_matches('*');
                let body = match rest.find("*/") {
                    Some(end) => &rest[..end],
                    None => {
                        in_block = true;
                        rest
                    }
                };
                LineKind::Comment(Some(body.trim().to_string()))
            } else {
                LineKind::Code
            };
            lines.push(kind);
        }

        Self { lines }
    }

    /// The comment run directly above 1-based `line`, joined with newlines.
    ///
    /// Returns an empty string when the previous line is blank or code.
    pub fn leading_comment(&self, line: usize) -> String {
        let mut texts = Vec::new();
        let mut idx = line.saturating_sub(1);

        while idx > 0 {
            match self.lines.get(idx - 1) {
                Some(LineKind::Comment(Some(text))) => texts.push(text.as_str()),
                Some(LineKind::Comment(None)) => {}
                _ => break,
            }
            idx -= 1;
        }

        texts.reverse();
        let joined = texts.join("\n");
        joined.trim().to_string()
    }
}

/// Replace every comment character with spaces, keeping newlines and byte
/// offsets intact. Block comments may nest.
pub fn blank_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut block_depth = 0usize;
    let mut in_line = false;

    while let Some(c) = chars.next() {
        if in_line {
            if c == '\n' {
                in_line = false;
                out.push(c);
            } else {
                blank(&mut out, c);
            }
            continue;
        }

        let next = chars.peek().copied();

        if block_depth > 0 {
            match (c, next) {
                ('*', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    block_depth -= 1;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    block_depth += 1;
                }
                ('\n', _) => out.push('\n'),
                _ => blank(&mut out, c),
            }
            continue;
        }

        match (c, next) {
            ('/', Some('/')) => {
                chars.next();
                out.push_str("  ");
                in_line = true;
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                block_depth = 1;
            }
            _ => out.push(c),
        }
    }

    out
}

fn blank(out: &mut String, c: char) {
    out.extend(std::iter::repeat(' ').take(c.len_utf8()));
}
