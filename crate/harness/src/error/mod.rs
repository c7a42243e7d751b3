use thiserror::Error;
use wycheproof_rsa_crypto::{CryptoError, HashAlgorithm};

use crate::test_case::{CaseState, ExpectedResult};

pub(crate) mod result;

/// A failed test case, or a corpus that could not be loaded.
///
/// Every case-level variant carries the Wycheproof `tcId` so a failure can be
/// traced back to its vector.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("test case {id}: hash {hash} is not supported")]
    UnsupportedHash { id: u64, hash: HashAlgorithm },

    #[error("test case {id}: key import failed: {source}")]
    Import {
        id: u64,
        #[source]
        source: CryptoError,
    },

    #[error("test case {id}: a key was already imported")]
    AlreadyImported { id: u64 },

    #[error("test case {id}: verification attempted before the key was imported")]
    NotImported { id: u64 },

    #[error("test case {id}: cannot verify a case in state {state}")]
    InvalidState { id: u64, state: CaseState },

    #[error("test case {id}: expected a {expected} signature but verification returned {verified}")]
    Mismatch {
        id: u64,
        expected: ExpectedResult,
        verified: bool,
    },

    #[error("test case {id}: expected a {expected} signature but verification failed: {source}")]
    UnexpectedError {
        id: u64,
        expected: ExpectedResult,
        #[source]
        source: CryptoError,
    },

    #[error("Corpus Error: {0}")]
    Corpus(String),

    #[error(transparent)]
    FromHex(#[from] hex::FromHexError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl HarnessError {
    /// The test case the error belongs to, if any.
    #[must_use]
    pub const fn case_id(&self) -> Option<u64> {
        match self {
            Self::UnsupportedHash { id, .. }
            | Self::Import { id, .. }
            | Self::AlreadyImported { id }
            | Self::NotImported { id }
            | Self::InvalidState { id, .. }
            | Self::Mismatch { id, .. }
            | Self::UnexpectedError { id, .. } => Some(*id),
            Self::Corpus(_) | Self::FromHex(_) | Self::Io(_) | Self::SerdeJson(_) => None,
        }
    }
}

/// Return early with a corpus error if a condition is not satisfied.
#[macro_export]
macro_rules! corpus_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::HarnessError::Corpus(
                ::core::format_args!($msg).to_string(),
            ));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::HarnessError::Corpus(
                ::core::format_args!($fmt, $($arg)*).to_string(),
            ));
        }
    };
}
