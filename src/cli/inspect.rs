//! Inspect command: dump one file's documentation model.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{DocError, Result};
use crate::output::Printer;
use crate::parser::parse_source;
use crate::resolve::{ImportIndex, Resolver, TypeLinks};
use crate::types::ParsedFile;

/// Parse one shader and print its model as JSON
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Shader file to parse
    pub file: PathBuf,

    /// Resolve type links against built-ins and the file's own structures
    #[arg(long)]
    pub resolve: bool,

    /// JSON file mapping extra type names to documentation URLs
    #[arg(long, requires = "resolve")]
    pub type_links: Option<PathBuf>,
}

/// Parse (and optionally resolve) the file; warnings go to the printer.
pub fn inspect(args: &InspectArgs, printer: &Printer) -> Result<ParsedFile> {
    let source = fs::read_to_string(&args.file).map_err(|e| DocError::Io {
        path: args.file.clone(),
        message: e.to_string(),
    })?;

    let output = parse_source(&source).map_err(|source| DocError::Import {
        path: args.file.clone(),
        source,
    })?;
    for warning in &output.warnings {
        printer.warning("warning", &warning.to_string());
    }

    let mut file = output.file;
    file.meta.filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.meta.source_path = args.file.clone();

    if args.resolve {
        let mut links = TypeLinks::builtin();
        if let Some(path) = &args.type_links {
            links.extend_from_file(path)?;
        }
        let index = ImportIndex::new();
        Resolver::new(&index, &links).resolve_file(&mut file);
    }

    Ok(file)
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let file = inspect(&args, printer)?;
    let json = serde_json::to_string_pretty(&file).map_err(|e| DocError::Render {
        message: format!("Failed to serialize model: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}
