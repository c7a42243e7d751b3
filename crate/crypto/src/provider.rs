use crate::{
    algorithm::{HashAlgorithm, KeyFormat, KeyUsage, RsaHashedImportParams, VerifyParams},
    error::result::CryptoResult,
    jwk::Jwk,
    key::CryptoKey,
};

/// A cryptography provider able to import RSA public keys and verify signatures.
///
/// Calls are synchronous: the work happens in-process. Implementations hold no
/// per-key state, so a single provider can be shared across threads and cases.
pub trait CryptoProvider: Send + Sync {
    /// Whether keys bound to `hash` can be imported.
    fn is_supported(&self, hash: HashAlgorithm) -> bool;

    /// Import a public key.
    ///
    /// # Errors
    /// - `NotSupported` if the hash is not supported
    /// - `Syntax` if `usages` is empty or names an operation a public key cannot perform
    /// - `Data` if the key material is malformed or inconsistent with `algorithm`
    fn import_key(
        &self,
        format: KeyFormat,
        key_material: &Jwk,
        algorithm: RsaHashedImportParams,
        extractable: bool,
        usages: &[KeyUsage],
    ) -> CryptoResult<CryptoKey>;

    /// Verify `signature` over `message`. The hash is the one bound into `key`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify.
    ///
    /// # Errors
    /// `InvalidAccess` if the key may not be used for verification, if
    /// `params` names another scheme than the key, or if the signature length
    /// does not match the modulus length.
    fn verify(
        &self,
        params: &VerifyParams,
        key: &CryptoKey,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool>;
}
