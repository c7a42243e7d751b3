use std::fmt;

use openssl::pkey::{PKey, Public};

use crate::algorithm::{KeyUsage, RsaHashedImportParams};

/// Opaque handle on an imported RSA public key.
///
/// The algorithm, the usages and the extractable flag are fixed at import
/// time. Cloning shares the underlying OpenSSL key.
#[derive(Clone)]
pub struct CryptoKey {
    pub(crate) key: PKey<Public>,
    algorithm: RsaHashedImportParams,
    usages: Vec<KeyUsage>,
    extractable: bool,
}

impl CryptoKey {
    pub(crate) fn new(
        key: PKey<Public>,
        algorithm: RsaHashedImportParams,
        usages: Vec<KeyUsage>,
        extractable: bool,
    ) -> Self {
        Self {
            key,
            algorithm,
            usages,
            extractable,
        }
    }

    #[must_use]
    pub const fn algorithm(&self) -> RsaHashedImportParams {
        self.algorithm
    }

    #[must_use]
    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    #[must_use]
    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    #[must_use]
    pub const fn extractable(&self) -> bool {
        self.extractable
    }

    /// Modulus length in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> u32 {
        self.key.bits()
    }

    /// Length in bytes of a signature produced under this key.
    #[must_use]
    pub fn signature_len(&self) -> usize {
        self.key.size()
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("modulus_bits", &self.modulus_bits())
            .field("usages", &self.usages)
            .field("extractable", &self.extractable)
            .finish()
    }
}
