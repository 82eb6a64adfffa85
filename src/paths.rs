//! Output page paths and hosted-source links.

use std::path::{Component, Path};

/// Page path for a source file, relative to the versioned output directory.
///
/// `crates/bevy_pbr/src/render/mesh.wgsl` becomes
/// `crates/bevy_pbr/render/mesh.html`: `src` segments are dropped, the
/// extension is removed and then successive repeated segments collapse, so
/// `ssao/ssao.wgsl` becomes `ssao.html`.
pub fn doc_path(source_root: &Path, file: &Path, extension: &str) -> String {
    let relative = file.strip_prefix(source_root).unwrap_or(file);

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some(stem) = Path::new(last.as_str()).file_stem() {
            *last = stem.to_string_lossy().into_owned();
        }
    }

    let mut segments: Vec<String> = Vec::with_capacity(parts.len());
    for part in parts {
        if part == "src" || segments.last().is_some_and(|last| *last == part) {
            continue;
        }
        segments.push(part);
    }

    format!("{}{}", segments.join("/"), extension)
}

/// Path of `file` relative to `source_root`, with `/` separators.
pub fn relative_source_path(source_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(source_root).unwrap_or(file);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a relative path against a base URL.
///
/// A base ending in `/` is a directory; otherwise its last segment is
/// replaced.
pub fn source_link(base_url: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches('/').replace(' ', "%20");
    if base_url.is_empty() {
        return relative;
    }

    let scheme_end = base_url.find("://").map_or(0, |idx| idx + 3);
    match base_url[scheme_end..].rfind('/') {
        Some(idx) => format!("{}{}", &base_url[..scheme_end + idx + 1], relative),
        None => format!("{}/{}", base_url, relative),
    }
}
