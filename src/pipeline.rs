//! Two-phase documentation build.
//!
//! Phase 1 reads and parses every file in discovery order and fills the
//! import index. Phase 2 starts only once the index is complete: each file
//! is resolved and rendered on a worker pool, sharing the index, the type
//! link table and the renderer read-only.

use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::discovery::{self, Manifest, DEFAULT_FILTER};
use crate::error::{DocError, Result};
use crate::parser::parse_source;
use crate::paths;
use crate::render::{
    build_search_index, write_assets, write_search_index, HtmlRenderer, IndexEntry, PageRenderer,
};
use crate::resolve::{ImportIndex, Resolver, TypeLinks};
use crate::types::{FileMeta, ParsedFile};

pub const DEFAULT_OUTPUT: &str = "dist";
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/bevyengine/bevy/tree/release-0.15.0/";
pub const DEFAULT_VERSION: &str = "0.15.0";
pub const PAGE_EXTENSION: &str = ".html";

/// Fully layered build settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub source: PathBuf,
    pub filter: String,
    pub output: PathBuf,
    pub source_url: String,
    pub version: String,
    pub type_links: Option<PathBuf>,
    pub excludes: Vec<String>,
    /// Skip files with malformed imports instead of aborting.
    pub isolate_failures: bool,
}

impl BuildConfig {
    /// Defaults for everything but the source directory.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            filter: DEFAULT_FILTER.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            type_links: None,
            excludes: Vec::new(),
            isolate_failures: false,
        }
    }

    /// `<output>/<version>`, where file pages and the index go.
    pub fn version_dir(&self) -> PathBuf {
        self.output.join(&self.version)
    }

    /// `<output>/public`, where shared assets go.
    pub fn public_dir(&self) -> PathBuf {
        self.output.join("public")
    }

    pub fn search_index_path(&self) -> PathBuf {
        self.public_dir()
            .join(format!("search-info-{}.json", self.version))
    }

    fn manifest(&self) -> Manifest {
        Manifest {
            excludes: self.excludes.clone(),
            ..Default::default()
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub files_parsed: usize,
    pub pages_written: usize,
    pub links_resolved: usize,
    pub search_entries: usize,
    pub exportable_files: usize,
    /// Files dropped because of malformed imports (isolated mode only).
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// Output of phase 1.
#[derive(Debug, Default)]
pub struct ParsedTree {
    pub files: Vec<ParsedFile>,
    pub index: ImportIndex,
    pub diagnostics: Diagnostics,
    pub skipped: Vec<PathBuf>,
}

/// Discover, parse, resolve and render with the HTML renderer.
pub fn run(config: &BuildConfig) -> Result<BuildReport> {
    let files = discovery::discover(&config.source, &config.filter, &config.manifest())?;
    tracing::info!(files = files.len(), source = %config.source.display(), "discovered shader files");

    let mut links = TypeLinks::builtin();
    if let Some(path) = &config.type_links {
        let added = links.extend_from_file(path)?;
        tracing::info!(added, path = %path.display(), "loaded type links");
    }

    let renderer = HtmlRenderer::new(config.version.clone());
    build(config, &files, &links, &renderer)
}

/// Build the site for an explicit file list.
pub fn build<R: PageRenderer>(
    config: &BuildConfig,
    files: &[PathBuf],
    links: &TypeLinks,
    renderer: &R,
) -> Result<BuildReport> {
    let started = Instant::now();

    let mut tree = parse_tree(config, files)?;
    tracing::info!(
        parsed = tree.files.len(),
        exportable = tree.index.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "phase 1 complete"
    );

    let links_resolved = render_pages(config, &mut tree.files, &tree.index, links, renderer)?;
    tracing::info!(
        pages = tree.files.len(),
        links_resolved,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "phase 2 complete"
    );

    let entries: Vec<IndexEntry> = tree.files.iter().map(IndexEntry::from_file).collect();
    write_file(
        &config.version_dir().join("index.html"),
        &renderer.render_index(&entries)?,
    )?;
    write_file(&config.output.join("404.html"), &renderer.render_not_found()?)?;
    write_assets(&config.public_dir())?;

    let search = build_search_index(&tree.files);
    write_search_index(&config.search_index_path(), &search)?;

    Ok(BuildReport {
        files_parsed: tree.files.len(),
        pages_written: tree.files.len(),
        links_resolved,
        search_entries: search.len(),
        exportable_files: tree.index.len(),
        skipped: tree.skipped,
        diagnostics: tree.diagnostics,
    })
}

/// Phase 1: parse sequentially and build the import index.
pub fn parse_tree(config: &BuildConfig, files: &[PathBuf]) -> Result<ParsedTree> {
    let mut tree = ParsedTree::default();
    let mut pages: HashMap<String, PathBuf> = HashMap::new();

    for path in files {
        let relative = paths::relative_source_path(&config.source, path);
        let source = fs::read_to_string(path).map_err(|e| DocError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let output = match parse_source(&source) {
            Ok(output) => output,
            Err(err) if config.isolate_failures => {
                tracing::warn!(file = %relative, error = %err, "skipping file");
                tree.diagnostics.push(
                    Diagnostic::error("wgsldoc::import", format!("{}; file skipped", err))
                        .in_file(&relative)
                        .with_help(format!("Statement: {}", err.statement)),
                );
                tree.skipped.push(path.clone());
                continue;
            }
            Err(source) => {
                return Err(DocError::Import {
                    path: path.clone(),
                    source,
                })
            }
        };

        tree.diagnostics.extend(
            output
                .warnings
                .iter()
                .map(|w| Diagnostic::from_parse_warning(Path::new(&relative), w)),
        );

        let mut file = output.file;
        file.meta = file_meta(config, path, &relative);

        if let Some(previous) = pages.insert(file.meta.doc_path.clone(), path.clone()) {
            tree.diagnostics.push(
                Diagnostic::warning(
                    "wgsldoc::build::page-collision",
                    format!(
                        "'{}' and '{}' both map to page {}",
                        paths::relative_source_path(&config.source, &previous),
                        relative,
                        file.meta.doc_path
                    ),
                )
                .in_file(&relative),
            );
        }

        if let Some(import_path) = &file.import_path {
            if !tree.index.insert(import_path.clone(), file.normalized_link()) {
                tree.diagnostics.push(
                    Diagnostic::warning(
                        "wgsldoc::build::duplicate-import-path",
                        format!("import path '{}' is already declared by another file", import_path),
                    )
                    .in_file(&relative)
                    .with_help("Only the first file declaring an import path is linked"),
                );
            }
        }

        tracing::debug!(
            file = %relative,
            declarations = file.declaration_count(),
            import_path = file.import_path.as_deref().unwrap_or(""),
            "parsed"
        );
        tree.files.push(file);
    }

    Ok(tree)
}

fn file_meta(config: &BuildConfig, path: &Path, relative: &str) -> FileMeta {
    let doc_path = paths::doc_path(&config.source, path, PAGE_EXTENSION);
    FileMeta {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source_path: PathBuf::from(relative),
        link: format!("{}/{}", config.version, doc_path),
        doc_path,
        source_link: paths::source_link(&config.source_url, relative),
    }
}

fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Phase 2: resolve and render every file in parallel. Returns the number of
/// type links resolved.
pub fn render_pages<R: PageRenderer>(
    config: &BuildConfig,
    files: &mut [ParsedFile],
    index: &ImportIndex,
    links: &TypeLinks,
    renderer: &R,
) -> Result<usize> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count())
        .build()
        .map_err(|e| DocError::Build {
            message: format!("Failed to start worker pool: {}", e),
            help: None,
        })?;

    let resolver = Resolver::new(index, links);
    let version_dir = config.version_dir();

    pool.install(|| {
        files
            .par_iter_mut()
            .map(|file| -> Result<usize> {
                let resolved = resolver.resolve_file(file);
                let page = renderer.render_file(file)?;
                write_file(&version_dir.join(&file.meta.doc_path), &page)?;
                tracing::debug!(page = %file.meta.doc_path, resolved, "rendered");
                Ok(resolved)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    fs::write(path, contents).map_err(|e| DocError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
