//! Source collection
//!
//! Resolves the command-line inputs to the list of template files of a run.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

use crate::config::RewriteConfig;

/// A template file and its content as read before the run
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(SourceFile {
            path: path.to_path_buf(),
            content,
        })
    }
}

/// Expand `roots` into template files.
///
/// A file root is taken as is; a directory root is searched with every
/// `include` pattern. Excluded paths are dropped, duplicates removed and
/// the result sorted.
pub fn collect_files(roots: &[PathBuf], config: &RewriteConfig) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for root in roots {
        if root.is_file() {
            files.insert(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("No such file or directory: {}", root.display());
        }
        for pattern in &config.include {
            let pattern = root.join(pattern);
            let pattern = pattern.to_string_lossy();
            let paths = glob(&pattern).map_err(|e| anyhow::anyhow!("Invalid glob pattern {}: {}", pattern, e))?;
            files.extend(paths.filter_map(std::result::Result::ok).filter(|path| path.is_file()));
        }
    }

    Ok(files.into_iter().filter(|path| !config.is_excluded(path)).collect())
}
