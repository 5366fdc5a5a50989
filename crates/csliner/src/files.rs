//! Input discovery.

use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;

/// Directory name that is never searched.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Paths excluded from every search: the dependency directory, configured
/// ignore paths and the output directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathFilter {
    excluded: Vec<PathBuf>,
}

impl PathFilter {
    pub fn new(excluded: Vec<PathBuf>) -> Self {
        Self { excluded }
    }

    pub fn from_config(root: &Path, config: &Config) -> Self {
        let mut excluded = config.ignore_roots(root);
        excluded.push(config.output_dir(root));
        Self::new(excluded)
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        path.components().any(|c| c.as_os_str() == DEPENDENCY_DIR)
            || self.excluded.iter().any(|dir| path.starts_with(dir))
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Lists the files under `root` (or `root` itself) with the given extension,
/// in file-name order.
pub fn find_files(root: &Path, extension: &str, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", root.display()),
        )
        .into());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !filter.is_excluded(entry.path()));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
