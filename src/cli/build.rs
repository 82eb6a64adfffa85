//! Build command implementation.
//!
//! Settings are layered: built-in defaults, then `wgsldoc.yaml`, then flags.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;

use crate::diagnostics::print_diagnostics;
use crate::discovery::{load_manifest, Manifest};
use crate::error::{DocError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{self, BuildConfig};

/// Generate documentation for a shader tree
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Root directory of the shader sources
    #[arg(long, short)]
    pub source: Option<PathBuf>,

    /// File-name glob selecting shader files [default: *.wgsl]
    #[arg(long)]
    pub filter: Option<String>,

    /// Output directory [default: dist]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Base URL of the hosted sources, used for "view source" links
    #[arg(long)]
    pub source_url: Option<String>,

    /// Version label used in output paths and the search index name
    #[arg(long, value_name = "LABEL")]
    pub doc_version: Option<String>,

    /// JSON file mapping extra type names to documentation URLs
    #[arg(long)]
    pub type_links: Option<PathBuf>,

    /// Manifest to read instead of ./wgsldoc.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip files with malformed imports instead of aborting
    #[arg(long)]
    pub isolate_failures: bool,
}

/// Combine defaults, manifest and flags. Relative manifest paths are taken
/// relative to the manifest's directory.
pub fn resolve_config(args: &BuildArgs, manifest: &Manifest, manifest_dir: &Path) -> Result<BuildConfig> {
    let from_manifest = |path: &PathBuf| manifest_dir.join(path);

    let source = args
        .source
        .clone()
        .or_else(|| manifest.source.as_ref().map(from_manifest))
        .ok_or_else(|| DocError::Config {
            message: "No source directory given".to_string(),
            help: Some("Pass --source DIR or set `source` in wgsldoc.yaml".to_string()),
        })?;

    let mut config = BuildConfig::new(source);
    config.excludes = manifest.excludes.clone();
    config.isolate_failures = args.isolate_failures;

    if let Some(filter) = args.filter.clone().or_else(|| manifest.filter.clone()) {
        config.filter = filter;
    }
    if let Some(output) = args
        .output
        .clone()
        .or_else(|| manifest.output.as_ref().map(from_manifest))
    {
        config.output = output;
    }
    if let Some(url) = args.source_url.clone().or_else(|| manifest.source_url.clone()) {
        config.source_url = url;
    }
    if let Some(version) = args.doc_version.clone().or_else(|| manifest.version.clone()) {
        config.version = version;
    }
    config.type_links = args
        .type_links
        .clone()
        .or_else(|| manifest.type_links.as_ref().map(from_manifest));

    Ok(config)
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let started = Instant::now();
    let cwd = std::env::current_dir()?;

    let (manifest, manifest_path) = load_manifest(&cwd, args.config.as_deref())?;
    let manifest_dir = manifest_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.clone());
    if let Some(path) = &manifest_path {
        printer.info("Using", &display_path(path));
    }

    let config = resolve_config(&args, &manifest, &manifest_dir)?;
    printer.status(
        "Scanning",
        &format!("{} ({})", display_path(&config.source), config.filter),
    );

    let report = pipeline::run(&config)?;

    printer.status(
        "Parsed",
        &format!(
            "{} ({} exportable)",
            plural(report.files_parsed, "file", "files"),
            report.exportable_files
        ),
    );
    printer.status(
        "Generated",
        &format!(
            "{}, {} in {}",
            plural(report.pages_written, "page", "pages"),
            plural(report.search_entries, "search entry", "search entries"),
            printer.cyan(&display_path(&config.output))
        ),
    );

    print_diagnostics(printer, &report.diagnostics);

    if !report.skipped.is_empty() {
        return Err(DocError::Build {
            message: format!(
                "{} skipped because of malformed imports",
                plural(report.skipped.len(), "file was", "files were")
            ),
            help: Some("Fix the reported `#import` statements and rebuild".to_string()),
        });
    }

    printer.status(
        "Finished",
        &format!(
            "{} in {:.2}s",
            config.version,
            started.elapsed().as_secs_f64()
        ),
    );
    Ok(())
}
