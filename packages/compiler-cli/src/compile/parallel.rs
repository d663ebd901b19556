use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use super::sources::SourceFile;

/// What happened to one file of a run
#[derive(Debug)]
pub enum FileOutcome {
    /// Rewritten; holds the new content
    Changed(String),
    Unchanged,
    Failed(anyhow::Error),
}

/// Run `rewrite` over every source on a worker pool of `jobs` threads
/// (rayon's default when `None`). Outcomes keep the order of `sources`.
pub fn parallel_rewrite<F>(
    sources: &[SourceFile],
    jobs: Option<usize>,
    rewrite: F,
) -> anyhow::Result<Vec<(PathBuf, FileOutcome)>>
where
    F: Fn(&SourceFile) -> anyhow::Result<String> + Sync,
{
    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()?;
    log::debug!(
        "rewriting {} files on {} threads",
        sources.len(),
        pool.current_num_threads()
    );

    let outcomes: Vec<(PathBuf, FileOutcome)> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| {
                let outcome = match rewrite(source) {
                    Ok(content) if content == source.content => FileOutcome::Unchanged,
                    Ok(content) => FileOutcome::Changed(content),
                    Err(error) => FileOutcome::Failed(error),
                };
                (source.path.clone(), outcome)
            })
            .collect()
    });

    log::debug!("rewrite finished in {:?}", start.elapsed());
    Ok(outcomes)
}
