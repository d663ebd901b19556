//! Perform Upgrade
//!
//! Batch entry points behind the `qwebc` subcommands: aggregate the
//! corpus, rewrite every file, write back what changed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use qweb_compiler::template::attributes::T_INHERIT;
use qweb_compiler::{aggregate_vars, replace_xpath_only, update_template, CorpusVars, Document, TemplateVars};

use crate::compile::{collect_files, parallel_rewrite, FileOutcome, SourceFile};
use crate::config::RewriteConfig;

/// Inputs of an `upgrade` or `xpath` run
#[derive(Debug, Clone, Default)]
pub struct UpgradeOptions {
    pub roots: Vec<PathBuf>,
    /// Variables file produced by `aggregate`, merged into the corpus maps
    pub vars_file: Option<PathBuf>,
    /// Report what would change without writing
    pub dry_run: bool,
}

/// Per-file results of a run
#[derive(Debug, Default)]
pub struct UpgradeReport {
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl UpgradeReport {
    pub fn succeeded(&self) -> usize {
        self.changed.len() + self.unchanged
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded(), self.failed.len())
    }

    fn fail(&mut self, path: PathBuf, error: anyhow::Error) {
        log::warn!("{}: {:#}", path.display(), error);
        self.failed.push((path, error));
    }
}

/// Read a variables file written by `aggregate`
pub fn load_vars(path: &Path) -> Result<CorpusVars> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read variables {}", path.display()))?;
    CorpusVars::from_json(&content).with_context(|| format!("Failed to parse variables {}", path.display()))
}

/// Collect the variables of every source. A file that does not parse is
/// skipped; its rewrite reports the error.
pub fn aggregate_sources(sources: &[SourceFile]) -> CorpusVars {
    let mut corpus = CorpusVars::default();
    for source in sources {
        if let Err(error) = aggregate_vars(&source.content, &mut corpus.outside_vars, &mut corpus.inside_vars) {
            log::warn!("{}: skipped during aggregation: {}", source.path.display(), error);
        }
    }
    log::info!(
        "aggregated {} call targets and {} templates",
        corpus.outside_vars.len(),
        corpus.inside_vars.len()
    );
    corpus
}

pub fn perform_aggregate(roots: &[PathBuf], config: &RewriteConfig) -> Result<CorpusVars> {
    let files = collect_files(roots, config)?;
    let sources = files
        .iter()
        .map(|path| SourceFile::read(path))
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate_sources(&sources))
}

/// Rewrite every template file under `options.roots`
pub fn perform_upgrade(options: &UpgradeOptions, config: &RewriteConfig) -> Result<UpgradeReport> {
    let mut report = UpgradeReport::default();
    let sources = read_sources(&options.roots, config, &mut report)?;

    let mut corpus = aggregate_sources(&sources);
    if let Some(path) = &options.vars_file {
        corpus.merge(&load_vars(path)?);
    }

    let outcomes = parallel_rewrite(&sources, config.jobs, |source| {
        Ok(update_template(&source.content, &corpus.outside_vars, &corpus.inside_vars)?)
    })?;
    apply_outcomes(outcomes, options.dry_run, &mut report);
    Ok(report)
}

/// Rewrite only the xpath selectors of patches to templates the corpus
/// does not define: the keys of the variables file plus the external
/// inheritance targets of each file.
pub fn perform_xpath_only(options: &UpgradeOptions, config: &RewriteConfig) -> Result<UpgradeReport> {
    let mut report = UpgradeReport::default();
    let sources = read_sources(&options.roots, config, &mut report)?;

    let known = match &options.vars_file {
        Some(path) => load_vars(path)?.inside_vars,
        None => TemplateVars::new(),
    };

    let outcomes = parallel_rewrite(&sources, config.jobs, |source| {
        let targets = xpath_targets(&source.content, &known, config)?;
        Ok(replace_xpath_only(&source.content, &targets)?)
    })?;
    apply_outcomes(outcomes, options.dry_run, &mut report);
    Ok(report)
}

fn xpath_targets(content: &str, known: &TemplateVars, config: &RewriteConfig) -> Result<TemplateVars> {
    let document = Document::parse(content, "template.xml")?;
    let mut targets = known.clone();
    for target in document.elements().filter_map(|element| element.get_attr(T_INHERIT)) {
        if config.is_external_target(target) {
            targets.entry(target.to_string()).or_default();
        }
    }
    Ok(targets)
}

/// Unreadable files go straight to the report
fn read_sources(roots: &[PathBuf], config: &RewriteConfig, report: &mut UpgradeReport) -> Result<Vec<SourceFile>> {
    let files = collect_files(roots, config)?;
    log::info!("found {} template files", files.len());

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        match SourceFile::read(&path) {
            Ok(source) => sources.push(source),
            Err(error) => report.fail(path, error),
        }
    }
    Ok(sources)
}

fn apply_outcomes(outcomes: Vec<(PathBuf, FileOutcome)>, dry_run: bool, report: &mut UpgradeReport) {
    for (path, outcome) in outcomes {
        match outcome {
            FileOutcome::Changed(content) => {
                if dry_run {
                    log::info!("would rewrite {}", path.display());
                    report.changed.push(path);
                    continue;
                }
                match fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display())) {
                    Ok(()) => {
                        log::info!("rewrote {}", path.display());
                        report.changed.push(path);
                    }
                    Err(error) => report.fail(path, error),
                }
            }
            FileOutcome::Unchanged => report.unchanged += 1,
            FileOutcome::Failed(error) => report.fail(path, error),
        }
    }
}
