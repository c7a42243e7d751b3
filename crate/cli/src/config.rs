use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use wycheproof_rsa_crypto::{HashAlgorithm, OpensslProvider};

use crate::{
    cli_ensure,
    error::{
        CliError,
        result::{CliResult, CliResultHelper},
    },
};

/// Environment variable pointing to a TOML configuration file.
pub const RSA_VECTORS_CONF_ENV: &str = "RSA_VECTORS_CONF";

const DEFAULT_JOBS: usize = 4;

/// Verify RSA signatures against Wycheproof test vector files.
///
/// SHA-1, SHA-256, SHA-384 and SHA-512 are always supported; vectors
/// using other hashes are skipped unless enabled with `--hash`.
#[derive(Parser, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[clap(name = "rsa-vectors", version, about, long_about = None)]
#[serde(default)]
pub struct ClapConfig {
    /// The Wycheproof vector files to run
    pub files: Vec<PathBuf>,

    /// Also support this hash algorithm, e.g. `SHA-224` or `SHA3-256`.
    /// May be repeated.
    #[clap(long = "hash", value_name = "NAME", verbatim_doc_comment)]
    pub hashes: Vec<HashAlgorithm>,

    /// Number of vector files run concurrently
    #[clap(long, short = 'j', default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Import the key of every test case, even when the same key was
    /// already imported for a previous case
    #[clap(long, default_value = "false")]
    pub no_key_cache: bool,

    /// An alternative to setting the `RUST_LOG` environment variable.
    /// Setting this variable will override the `RUST_LOG` environment variable
    #[clap(long, env("RSA_VECTORS_RUST_LOG"), verbatim_doc_comment)]
    pub rust_log: Option<String>,

    /// A TOML file holding this configuration.
    /// Its settings replace the command-line ones; files given on the
    /// command line are run after the ones the file lists.
    #[clap(long, env("RSA_VECTORS_CONF"), verbatim_doc_comment)]
    #[serde(skip)]
    pub conf: Option<PathBuf>,
}

impl Default for ClapConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            hashes: Vec::new(),
            jobs: DEFAULT_JOBS,
            no_key_cache: false,
            rust_log: None,
            conf: None,
        }
    }
}

impl ClapConfig {
    /// Parse the command line, then the configuration file it points to, if any.
    ///
    /// # Errors
    /// An unreadable or malformed configuration file, or nothing to run.
    pub fn load() -> CliResult<Self> {
        Self::parse().resolve()
    }

    /// Apply the configuration file named by `conf`, then validate.
    ///
    /// # Errors
    /// An unreadable or malformed configuration file, or nothing to run.
    pub fn resolve(self) -> CliResult<Self> {
        let config = match self.conf.clone() {
            Some(path) => {
                let mut from_file = Self::from_toml_file(&path)?;
                from_file.files.extend(self.files);
                from_file.conf = Some(path);
                from_file
            }
            None => self,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// The file cannot be read or is not a valid configuration.
    pub fn from_toml_file(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file {}", path.display()))?;
        Ok(toml::from_str(&content)?)
    }

    fn validate(&self) -> CliResult<()> {
        cli_ensure!(
            !self.files.is_empty(),
            CliError::Configuration("no vector file to run".to_owned())
        );
        cli_ensure!(
            self.jobs > 0,
            CliError::Configuration("the number of jobs must be at least 1".to_owned())
        );
        Ok(())
    }

    /// The OpenSSL provider, with the extra hashes enabled.
    #[must_use]
    pub fn provider(&self) -> OpensslProvider {
        self.hashes
            .iter()
            .fold(OpensslProvider::new(), |provider, hash| provider.allow_hash(*hash))
    }
}
