use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Config file looked up in the working directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "qwebc.json";

/// Settings of a batch rewrite, read from `qwebc.json`.
///
/// Every field is optional in the file; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Glob patterns, relative to each input directory
    pub include: Vec<String>,
    /// Paths containing one of these substrings are skipped
    pub exclude: Vec<String>,
    /// Inheritance targets with one of these prefixes are templates living
    /// outside the corpus
    pub external_inherit_prefixes: Vec<String>,
    /// Worker threads, rayon's default when unset
    pub jobs: Option<usize>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            include: vec!["**/*.xml".to_string()],
            exclude: Vec::new(),
            external_inherit_prefixes: vec!["web.".to_string()],
            jobs: None,
        }
    }
}

impl RewriteConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else `qwebc.json` from `dir` if it exists,
    /// else the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path: PathBuf = dir.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            log::debug!("using config {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.exclude.iter().any(|pattern| path.contains(pattern.as_str()))
    }

    pub fn is_external_target(&self, template: &str) -> bool {
        self.external_inherit_prefixes
            .iter()
            .any(|prefix| template.starts_with(prefix.as_str()))
    }
}
