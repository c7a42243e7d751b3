use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Hash functions a signature key can be bound to.
///
/// The names are the ones used by Wycheproof test vectors and WebCrypto
/// (`SHA-256`, `SHA3-384`, ...). Parsing is case sensitive.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum HashAlgorithm {
    #[strum(serialize = "MD5")]
    #[serde(rename = "MD5")]
    Md5,
    #[strum(serialize = "SHA-1")]
    #[serde(rename = "SHA-1")]
    Sha1,
    #[strum(serialize = "SHA-224")]
    #[serde(rename = "SHA-224")]
    Sha224,
    #[strum(serialize = "SHA-256")]
    #[serde(rename = "SHA-256")]
    Sha256,
    #[strum(serialize = "SHA-384")]
    #[serde(rename = "SHA-384")]
    Sha384,
    #[strum(serialize = "SHA-512")]
    #[serde(rename = "SHA-512")]
    Sha512,
    #[strum(serialize = "SHA3-224")]
    #[serde(rename = "SHA3-224")]
    Sha3_224,
    #[strum(serialize = "SHA3-256")]
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[strum(serialize = "SHA3-384")]
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[strum(serialize = "SHA3-512")]
    #[serde(rename = "SHA3-512")]
    Sha3_512,
}

impl HashAlgorithm {
    /// The hashes a browser exposes for RSA signatures.
    pub const WEBCRYPTO: [Self; 4] = [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Suffix of the JWK `alg` member (`RS256`, `PS512`, ...), when one exists.
    #[must_use]
    pub const fn jwk_suffix(self) -> Option<&'static str> {
        match self {
            Self::Sha1 => Some("1"),
            Self::Sha256 => Some("256"),
            Self::Sha384 => Some("384"),
            Self::Sha512 => Some("512"),
            _ => None,
        }
    }
}

/// RSA signature schemes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum SignatureScheme {
    #[strum(serialize = "RSASSA-PKCS1-v1_5")]
    #[serde(rename = "RSASSA-PKCS1-v1_5")]
    RsassaPkcs1v15,
    #[strum(serialize = "RSA-PSS")]
    #[serde(rename = "RSA-PSS")]
    RsaPss,
}

impl SignatureScheme {
    /// Expected JWK `alg` member for this scheme bound to `hash`.
    #[must_use]
    pub fn jwk_alg(self, hash: HashAlgorithm) -> Option<String> {
        let prefix = match self {
            Self::RsassaPkcs1v15 => "RS",
            Self::RsaPss => "PS",
        };
        hash.jwk_suffix().map(|suffix| format!("{prefix}{suffix}"))
    }
}

/// Operations a key handle may be used for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    DeriveKey,
    DeriveBits,
    WrapKey,
    UnwrapKey,
}

/// Key material formats accepted by the provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum KeyFormat {
    #[strum(serialize = "jwk")]
    Jwk,
}

/// Algorithm descriptor supplied at import time: the hash is bound into the key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RsaHashedImportParams {
    pub name: SignatureScheme,
    pub hash: HashAlgorithm,
}

/// Algorithm descriptor supplied at verification time.
///
/// Only the scheme is named here; PSS additionally carries the salt length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerifyParams {
    RsassaPkcs1v15,
    RsaPss { salt_length: usize },
}

impl VerifyParams {
    #[must_use]
    pub const fn scheme(&self) -> SignatureScheme {
        match self {
            Self::RsassaPkcs1v15 => SignatureScheme::RsassaPkcs1v15,
            Self::RsaPss { .. } => SignatureScheme::RsaPss,
        }
    }
}
