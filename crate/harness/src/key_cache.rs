use std::collections::HashMap;

use tracing::trace;
use wycheproof_rsa_crypto::{CryptoKey, CryptoProvider, HashAlgorithm, SignatureScheme};

use crate::{error::result::HarnessResult, test_case::RsaSignatureTestCase};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct KeyFingerprint {
    e: String,
    n: String,
    scheme: SignatureScheme,
    hash: HashAlgorithm,
}

impl KeyFingerprint {
    fn of(case: &RsaSignatureTestCase) -> Self {
        Self {
            e: case.e.clone(),
            n: case.n.clone(),
            scheme: case.scheme,
            hash: case.hash_alg,
        }
    }
}

/// Imported key handles shared by the cases of a corpus that use the same
/// `(e, n, scheme, hash)`.
///
/// Wycheproof groups hundreds of vectors under one key: importing it once
/// saves time and leaves every outcome unchanged.
#[derive(Debug, Default)]
pub struct KeyCache {
    keys: HashMap<KeyFingerprint, CryptoKey>,
    hits: usize,
}

impl KeyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the import phase of `case`, reusing a cached handle when possible.
    ///
    /// # Errors
    /// The errors of [`RsaSignatureTestCase::import_key`].
    pub fn import_key<P>(&mut self, case: &mut RsaSignatureTestCase, provider: &P) -> HarnessResult<()>
    where
        P: CryptoProvider + ?Sized,
    {
        let fingerprint = KeyFingerprint::of(case);
        if let Some(key) = self.keys.get(&fingerprint) {
            trace!("test case {}: reusing imported key", case.id);
            case.attach_key(provider, key.clone())?;
            self.hits += 1;
            return Ok(());
        }
        case.import_key(provider)?;
        if let Some(key) = case.key() {
            self.keys.insert(fingerprint, key.clone());
        }
        Ok(())
    }

    /// Number of distinct keys imported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of imports served from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }
}
