//! Conformance harness for RSA signature verification.
//!
//! Each Wycheproof vector becomes an [`RsaSignatureTestCase`]: its key is
//! imported through a [`CryptoProvider`](wycheproof_rsa_crypto::CryptoProvider),
//! the signature is verified and the outcome compared with the expected
//! result of the vector.

pub use corpus::{Corpus, CorpusEntry};
pub use error::{
    HarnessError,
    result::{HarnessResult, HarnessResultHelper},
};
pub use key_cache::KeyCache;
pub use runner::{CorpusRunner, RunSummary};
pub use test_case::{CaseState, ExpectedResult, RsaSignatureTestCase, Verdict, check_outcome};

mod corpus;
mod error;
mod key_cache;
mod runner;
mod test_case;

pub mod reexport {
    pub use wycheproof_rsa_crypto;
}
