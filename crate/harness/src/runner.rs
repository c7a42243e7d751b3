use std::fmt;

use tracing::{debug, info, warn};
use wycheproof_rsa_crypto::CryptoProvider;

use crate::{
    corpus::{Corpus, CorpusEntry},
    error::HarnessError,
    key_cache::KeyCache,
    test_case::{RsaSignatureTestCase, Verdict},
};

/// Totals of a corpus run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub algorithm: String,
    pub passed: usize,
    /// Passing cases where the provider refused to verify.
    pub refused: usize,
    pub skipped: Vec<(u64, String)>,
    pub failures: Vec<HarnessError>,
}

impl RunSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.skipped.len() + self.failures.len()
    }

    /// No case failed and at least one ran.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.passed > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} tests, passed {} (refused {}), skipped {}, failed {}",
            self.algorithm,
            self.total(),
            self.passed,
            self.refused,
            self.skipped.len(),
            self.failures.len()
        )
    }
}

/// Runs every case of a corpus against a provider.
///
/// Cases are independent: a failing case is recorded and the run goes on.
pub struct CorpusRunner<'a, P: CryptoProvider + ?Sized> {
    provider: &'a P,
    key_cache: Option<KeyCache>,
}

impl<'a, P: CryptoProvider + ?Sized> CorpusRunner<'a, P> {
    #[must_use]
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            key_cache: Some(KeyCache::new()),
        }
    }

    /// Import the key of every case, even when an identical key was already imported.
    #[must_use]
    pub fn without_key_cache(mut self) -> Self {
        self.key_cache = None;
        self
    }

    pub fn run(&mut self, corpus: Corpus) -> RunSummary {
        let mut summary = RunSummary {
            algorithm: corpus.algorithm,
            ..RunSummary::default()
        };
        for entry in corpus.entries {
            match entry {
                CorpusEntry::Skipped { id, reason } => summary.skipped.push((id, reason)),
                CorpusEntry::Case(mut case) => {
                    // hashes the provider cannot bind are filtered out before import
                    if !self.provider.is_supported(case.hash_alg) {
                        summary
                            .skipped
                            .push((case.id, format!("hash {} is not supported", case.hash_alg)));
                        continue;
                    }
                    match self.run_case(&mut case) {
                        Ok(verdict) => {
                            summary.passed += 1;
                            if verdict == Verdict::Refused {
                                summary.refused += 1;
                            }
                        }
                        Err(e) => summary.failures.push(e),
                    }
                }
            }
        }
        if let Some(cache) = &self.key_cache {
            debug!("{} keys imported, {} imports served from cache", cache.len(), cache.hits());
        }
        if summary.failures.is_empty() {
            info!("{summary}");
        } else {
            warn!("{summary}");
        }
        summary
    }

    fn run_case(&mut self, case: &mut RsaSignatureTestCase) -> Result<Verdict, HarnessError> {
        match self.key_cache.as_mut() {
            Some(cache) => cache.import_key(case, self.provider)?,
            None => case.import_key(self.provider)?,
        }
        case.verify(self.provider)
    }
}
