//! Type-link resolution.
//!
//! Each type reference is tried against, in order:
//! 1. the built-in table (`TypeLinks`),
//! 2. the file's own imports, mapped through the cross-file `ImportIndex`,
//! 3. structures declared in the same file.
//!
//! A reference matching none of these stays unresolved.

mod builtins;
mod index;

use std::collections::{HashMap, HashSet};

pub use builtins::TypeLinks;
pub use index::ImportIndex;

use crate::types::{bare_type_name, ParsedFile, TypeInfo};

/// Resolves type links for one file at a time against shared, read-only
/// tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a ImportIndex,
    links: &'a TypeLinks,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a ImportIndex, links: &'a TypeLinks) -> Self {
        Self { index, links }
    }

    /// Fill in every empty `type_link` in `file`. Returns the number of
    /// references resolved by this call.
    pub fn resolve_file(&self, file: &mut ParsedFile) -> usize {
        let imports = self.import_targets(file);
        let structures: HashSet<String> = file
            .structure_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut resolved = 0;
        file.for_each_type_info_mut(|info| {
            if self.resolve_type(info, &imports, &structures) {
                resolved += 1;
            }
        });

        tracing::debug!(
            file = %file.meta.filename,
            imports = imports.len(),
            resolved,
            "resolved type links"
        );
        resolved
    }

    /// Used name -> page link of the module it was imported from.
    fn import_targets(&self, file: &ParsedFile) -> HashMap<String, String> {
        file.declared_imports
            .iter()
            .filter_map(|(name, paths)| {
                let first = paths.first()?;
                let link = self.index.longest_prefix(first)?;
                Some((name.to_string(), link.to_string()))
            })
            .collect()
    }

    fn resolve_type(
        &self,
        info: &mut TypeInfo,
        imports: &HashMap<String, String>,
        structures: &HashSet<String>,
    ) -> bool {
        if info.is_resolved() {
            return false;
        }

        let bare = info.bare_name().to_string();
        if let Some(link) = self.links.get(&bare) {
            info.type_link = link.to_string();
            return true;
        }

        let full = if info.full_type_path.is_empty() {
            info.ty.as_str()
        } else {
            info.full_type_path.as_str()
        };
        let head = full.split("::").next().unwrap_or(full);
        let target = bare_type_name(head);

        if let Some(link) = imports.get(target) {
            info.type_link = format!("{}#{}", link, bare);
            info.type_link_targets_new_context = true;
            return true;
        }

        if structures.contains(&bare) {
            info.type_link = format!("#{}", bare);
            info.type_link_targets_new_context = false;
            return true;
        }

        false
    }
}
