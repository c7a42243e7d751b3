use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::{
    crypto_ensure,
    error::{CryptoError, result::CryptoResult},
};

/// An RSA public key in JSON Web Key form (RFC 7517 / RFC 7518 §6.3.1).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    /// Public exponent, base64url without padding.
    pub e: String,
    /// Modulus, base64url without padding.
    pub n: String,
    #[serde(default = "default_ext")]
    pub ext: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
}

const fn default_ext() -> bool {
    true
}

impl Jwk {
    /// Build an exportable RSA JWK from its base64url components.
    #[must_use]
    pub fn rsa_public(e: &str, n: &str) -> Self {
        Self {
            kty: "RSA".to_owned(),
            e: e.to_owned(),
            n: n.to_owned(),
            ext: true,
            alg: None,
            use_: None,
        }
    }

    /// Build an RSA JWK from big-endian exponent and modulus bytes.
    #[must_use]
    pub fn from_components(e: &[u8], n: &[u8]) -> Self {
        Self::rsa_public(&encode_integer(e), &encode_integer(n))
    }

    /// Decoded `(e, n)` big-endian bytes.
    ///
    /// # Errors
    /// Returns a `Data` error if either member is not base64url or encodes zero.
    pub fn decode_components(&self) -> CryptoResult<(Vec<u8>, Vec<u8>)> {
        Ok((
            decode_integer("e", &self.e)?,
            decode_integer("n", &self.n)?,
        ))
    }
}

/// Encode a big-endian unsigned integer as base64url, dropping leading zero bytes.
#[must_use]
pub fn encode_integer(bytes: &[u8]) -> String {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    URL_SAFE_NO_PAD.encode(&bytes[first..])
}

fn decode_integer(member: &str, value: &str) -> CryptoResult<Vec<u8>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| CryptoError::Data(format!("JWK member `{member}`: {e}")))?;
    crypto_ensure!(
        bytes.iter().any(|b| *b != 0),
        CryptoError::Data(format!("JWK member `{member}` must encode a positive integer"))
    );
    Ok(bytes)
}
