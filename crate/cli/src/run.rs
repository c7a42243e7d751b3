use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task::JoinSet;
use tracing::{debug, warn};
use wycheproof_rsa_crypto::OpensslProvider;
use wycheproof_rsa_harness::{Corpus, CorpusRunner, HarnessResult, RunSummary};

use crate::{config::ClapConfig, error::result::CliResult};

/// The outcome of one vector file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: HarnessResult<RunSummary>,
}

impl FileReport {
    /// The file was loaded and none of its cases failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, Ok(summary) if summary.failures.is_empty())
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(summary) => {
                write!(f, "{}: {summary}", self.path.display())?;
                for failure in &summary.failures {
                    write!(f, "\n  {failure}")?;
                }
                Ok(())
            }
            Err(e) => write!(f, "{}: cannot load test vectors: {e}", self.path.display()),
        }
    }
}

/// Run every vector file of `config`, at most `config.jobs` at a time.
///
/// Reports come back in the order of `config.files`. A file that cannot be
/// loaded is reported and does not stop the others.
///
/// # Errors
/// A worker task panicked.
pub async fn run_files(config: &ClapConfig) -> CliResult<Vec<FileReport>> {
    let provider = Arc::new(config.provider());
    let use_key_cache = !config.no_key_cache;
    let mut tasks = JoinSet::new();
    let mut reports = Vec::with_capacity(config.files.len());

    for (index, path) in config.files.iter().cloned().enumerate() {
        if tasks.len() >= config.jobs {
            if let Some(done) = tasks.join_next().await {
                reports.push(done?);
            }
        }
        let provider = Arc::clone(&provider);
        tasks.spawn_blocking(move || {
            let outcome = run_file(&path, &provider, use_key_cache);
            (index, FileReport { path, outcome })
        });
    }
    while let Some(done) = tasks.join_next().await {
        reports.push(done?);
    }

    reports.sort_by_key(|(index, _)| *index);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

fn run_file(
    path: &Path,
    provider: &OpensslProvider,
    use_key_cache: bool,
) -> HarnessResult<RunSummary> {
    let corpus = Corpus::load(path)?;
    debug!(
        "{}: {} vectors, algorithm {}",
        path.display(),
        corpus.len(),
        corpus.algorithm
    );
    let mut runner = CorpusRunner::new(provider);
    if !use_key_cache {
        runner = runner.without_key_cache();
    }
    let summary = runner.run(corpus);
    if summary.passed == 0 && summary.failures.is_empty() {
        warn!("{}: no test case could be run", path.display());
    }
    Ok(summary)
}
