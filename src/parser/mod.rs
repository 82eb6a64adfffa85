//! WGSL source parsing.
//!
//! Extraction is heuristic: declarations are pattern-matched over a copy of
//! the source with comments blanked out, then enriched with line numbers,
//! leading comments and the `#ifdef` branches that enclose them. The
//! `#import` mini-language is the one part parsed with a real grammar.
//!
//! # Usage
//!
//! ```ignore
//! use wgsldoc::parser::parse_source;
//!
//! let source = std::fs::read_to_string("mesh_functions.wgsl")?;
//! let output = parse_source(&source)?;
//!
//! for function in &output.file.functions {
//!     println!("{} at line {}", function.name, function.line_number);
//! }
//! ```

mod bindings;
mod comments;
mod consts;
mod context;
mod file;
mod functions;
mod named;
mod structs;
pub mod imports;
pub mod shader_defs;
pub mod span;
pub mod tokenizer;

use std::fmt;

pub use bindings::BindingExtractor;
pub use comments::{blank_comments, LineComments};
pub use consts::{infer_type, ConstExtractor};
pub use context::{Extractor, SourceContext};
pub use file::{parse_source, ParseOutput};
pub use functions::FunctionExtractor;
pub use imports::{
    extract_all_imports, extract_import_blocks, parse_import_statement, DeclaredImports,
    ImportError, ImportErrorKind,
};
pub use shader_defs::{Branch, DefResult, Directive, ShaderDefBlock, ShaderDefIndex};
pub use span::LineIndex;
pub use structs::StructExtractor;

/// What a parse warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    ShaderDef,
    Import,
}

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: WarningKind,
    /// 1-based line, or 0 when the warning is not tied to one line.
    pub line: usize,
    pub message: String,
}

impl ParseWarning {
    pub fn new(kind: WarningKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: {}", self.line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}
