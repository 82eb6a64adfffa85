//! Static files shared by every page.

use std::fs;
use std::path::Path;

use crate::error::{DocError, Result};

pub const STYLESHEET: &str = include_str!("../../assets/styles.css");
pub const SEARCH_SCRIPT: &str = include_str!("../../assets/search.js");

/// Write the stylesheet and search script into `public_dir`.
pub fn write_assets(public_dir: &Path) -> Result<()> {
    fs::create_dir_all(public_dir).map_err(|e| DocError::Io {
        path: public_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    for (name, contents) in [("styles.css", STYLESHEET), ("search.js", SEARCH_SCRIPT)] {
        let path = public_dir.join(name);
        fs::write(&path, contents).map_err(|e| DocError::Io {
            path,
            message: e.to_string(),
        })?;
    }

    Ok(())
}
