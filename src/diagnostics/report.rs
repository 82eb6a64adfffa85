//! Diagnostic records collected during a build.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::parser::{ParseWarning, WarningKind};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single non-fatal problem, usually tied to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, e.g. `wgsldoc::parse::shader-def`.
    pub code: String,
    pub message: String,
    pub file: Option<PathBuf>,
    /// 1-based line within `file`.
    pub line: Option<usize>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            file: None,
            line: None,
            help: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    /// Warning for a recoverable parse problem in `file`.
    pub fn from_parse_warning(file: &Path, warning: &ParseWarning) -> Self {
        let code = match warning.kind {
            WarningKind::Import => "wgsldoc::parse::import",
            WarningKind::ShaderDef => "wgsldoc::parse::shader-def",
        };
        let diagnostic = Self::warning(code, warning.message.clone()).in_file(file);
        if warning.line > 0 {
            diagnostic.at_line(warning.line)
        } else {
            diagnostic
        }
    }

    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// `path:line` when known.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?.display();
        Some(match self.line {
            Some(line) => format!("{}:{}", file, line),
            None => file.to_string(),
        })
    }
}

/// Diagnostics gathered over a run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let diagnostics = Diagnostics::new();

        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn test_counts_and_merge() {
        let mut a = Diagnostics::new();
        a.push(Diagnostic::error("wgsldoc::import", "bad import"));

        let mut b = Diagnostics::new();
        b.push(Diagnostic::warning("wgsldoc::parse::shader-def", "unclosed"));

        a.merge(b);

        assert!(a.has_errors());
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_from_parse_warning() {
        let warning = ParseWarning::new(WarningKind::ShaderDef, 4, "unclosed #ifdef FOO");
        let d = Diagnostic::from_parse_warning(Path::new("a/b.wgsl"), &warning);

        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.code, "wgsldoc::parse::shader-def");
        assert_eq!(d.location().as_deref(), Some("a/b.wgsl:4"));
    }

    #[test]
    fn test_file_level_warning_has_no_line() {
        let warning = ParseWarning::new(WarningKind::Import, 0, "unterminated import group");
        let d = Diagnostic::from_parse_warning(Path::new("x.wgsl"), &warning);

        assert_eq!(d.code, "wgsldoc::parse::import");
        assert_eq!(d.location().as_deref(), Some("x.wgsl"));
    }

    #[test]
    fn test_with_help() {
        let d = Diagnostic::error("wgsldoc::import", "bad").with_help("fix it");
        assert_eq!(d.help.as_deref(), Some("fix it"));
    }
}
