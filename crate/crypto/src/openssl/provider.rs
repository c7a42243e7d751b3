use std::collections::BTreeSet;

use openssl::{
    bn::BigNum,
    pkey::{PKey, Public},
    rsa::{Padding, Rsa},
    sign::{RsaPssSaltlen, Verifier},
};
use tracing::debug;

use super::hashing::hashing_algorithm_to_openssl;
use crate::{
    algorithm::{HashAlgorithm, KeyFormat, KeyUsage, RsaHashedImportParams, VerifyParams},
    crypto_ensure,
    error::{
        CryptoError,
        result::{CryptoResult, CryptoResultHelper},
    },
    jwk::Jwk,
    key::CryptoKey,
    provider::CryptoProvider,
};

/// Cryptography provider backed by OpenSSL.
///
/// The set of hashes keys may be bound to defaults to the browser set
/// (SHA-1, SHA-256, SHA-384 and SHA-512) and can be widened.
#[derive(Clone, Debug)]
pub struct OpensslProvider {
    supported_hashes: BTreeSet<HashAlgorithm>,
}

impl Default for OpensslProvider {
    fn default() -> Self {
        Self::with_supported_hashes(HashAlgorithm::WEBCRYPTO)
    }
}

impl OpensslProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider accepting exactly the given hashes.
    #[must_use]
    pub fn with_supported_hashes(hashes: impl IntoIterator<Item = HashAlgorithm>) -> Self {
        Self {
            supported_hashes: hashes.into_iter().collect(),
        }
    }

    /// Add `hash` to the supported set.
    #[must_use]
    pub fn allow_hash(mut self, hash: HashAlgorithm) -> Self {
        self.supported_hashes.insert(hash);
        self
    }

    pub fn supported_hashes(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.supported_hashes.iter().copied()
    }

    fn import_jwk(
        jwk: &Jwk,
        algorithm: RsaHashedImportParams,
        extractable: bool,
    ) -> CryptoResult<PKey<Public>> {
        crypto_ensure!(
            jwk.kty == "RSA",
            CryptoError::Data(format!("JWK key type must be RSA, got {:?}", jwk.kty))
        );
        if let Some(use_) = &jwk.use_ {
            crypto_ensure!(
                use_ == "sig",
                CryptoError::Data(format!("JWK `use` must be `sig` for a signature key, got {use_:?}"))
            );
        }
        crypto_ensure!(
            jwk.ext || !extractable,
            CryptoError::Data("JWK is not extractable but an extractable key was requested".to_owned())
        );
        // hashes without a registered JWS name leave `alg` unchecked
        if let (Some(alg), Some(expected)) = (&jwk.alg, algorithm.name.jwk_alg(algorithm.hash)) {
            crypto_ensure!(
                *alg == expected,
                CryptoError::Data(format!("JWK `alg` is {alg}, expected {expected}"))
            );
        }

        let (e, n) = jwk.decode_components()?;
        let n = BigNum::from_slice(&n).data_context("RSA modulus")?;
        let e = BigNum::from_slice(&e).data_context("RSA public exponent")?;
        let rsa = Rsa::from_public_components(n, e).data_context("RSA public key")?;
        Ok(PKey::from_rsa(rsa)?)
    }
}

impl CryptoProvider for OpensslProvider {
    fn is_supported(&self, hash: HashAlgorithm) -> bool {
        self.supported_hashes.contains(&hash)
    }

    fn import_key(
        &self,
        format: KeyFormat,
        key_material: &Jwk,
        algorithm: RsaHashedImportParams,
        extractable: bool,
        usages: &[KeyUsage],
    ) -> CryptoResult<CryptoKey> {
        crypto_ensure!(
            self.is_supported(algorithm.hash),
            CryptoError::NotSupported(format!(
                "hash {} for {} keys",
                algorithm.hash, algorithm.name
            ))
        );
        crypto_ensure!(
            !usages.is_empty(),
            CryptoError::Syntax("a public key must be imported with at least one usage".to_owned())
        );
        if let Some(usage) = usages.iter().find(|u| **u != KeyUsage::Verify) {
            return Err(CryptoError::Syntax(format!(
                "usage `{usage}` is not valid for an {} public key",
                algorithm.name
            )));
        }

        let key = match format {
            KeyFormat::Jwk => Self::import_jwk(key_material, algorithm, extractable)?,
        };
        debug!(
            "imported {} public key: {} bits, hash {}",
            algorithm.name,
            key.bits(),
            algorithm.hash
        );
        Ok(CryptoKey::new(key, algorithm, usages.to_vec(), extractable))
    }

    fn verify(
        &self,
        params: &VerifyParams,
        key: &CryptoKey,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool> {
        let algorithm = key.algorithm();
        crypto_ensure!(
            key.allows(KeyUsage::Verify),
            CryptoError::InvalidAccess("key usages do not include `verify`".to_owned())
        );
        crypto_ensure!(
            params.scheme() == algorithm.name,
            CryptoError::InvalidAccess(format!(
                "key was imported for {}, not {}",
                algorithm.name,
                params.scheme()
            ))
        );
        crypto_ensure!(
            signature.len() == key.signature_len(),
            CryptoError::InvalidAccess(format!(
                "signature is {} bytes long, the modulus is {} bytes long",
                signature.len(),
                key.signature_len()
            ))
        );

        let message_digest = hashing_algorithm_to_openssl(algorithm.hash);
        let mut verifier = Verifier::new(message_digest, &key.key)?;
        match params {
            VerifyParams::RsassaPkcs1v15 => {
                verifier.set_rsa_padding(Padding::PKCS1)?;
            }
            VerifyParams::RsaPss { salt_length } => {
                verifier.set_rsa_padding(Padding::PKCS1_PSS)?;
                verifier.set_rsa_mgf1_md(message_digest)?;
                verifier.set_rsa_pss_saltlen(RsaPssSaltlen::custom(i32::try_from(*salt_length)?))?;
            }
        }
        // OpenSSL reports a padding that does not decode as an error: that is a negative result
        Ok(match verifier.verify_oneshot(signature, message) {
            Ok(verified) => verified,
            Err(err) => {
                debug!("{} verification rejected the signature: {err}", algorithm.name);
                false
            }
        })
    }
}
