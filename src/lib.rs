//! wgsldoc - Documentation generator for WGSL shader trees
//!
//! Parses `.wgsl` sources (including the `#import` / `#ifdef` preprocessor
//! dialect), links type references across files and renders a static HTML
//! site with a client-side search index.

pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;
pub mod parser;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod types;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use discovery::{discover, Manifest};
pub use error::{DocError, Result};
pub use parser::{parse_source, DeclaredImports, ImportError, ParseOutput, ParseWarning};
pub use pipeline::{build, run, BuildConfig, BuildReport};
pub use render::{HtmlRenderer, IndexEntry, PageRenderer, SearchEntry};
pub use resolve::{ImportIndex, Resolver, TypeLinks};
pub use types::{
    Annotation, Binding, Const, DefContext, FileMeta, Function, NamedType, ParsedFile, Stage,
    Structure, TypeInfo,
};
