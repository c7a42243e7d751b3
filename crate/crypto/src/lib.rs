//! RSA public key import and signature verification.
//!
//! Keys are imported from JWK material into an opaque [`CryptoKey`] bound to
//! one signature scheme and one hash, then used to verify signatures through
//! a [`CryptoProvider`]. [`OpensslProvider`] is the OpenSSL-backed provider.

pub use algorithm::{
    HashAlgorithm, KeyFormat, KeyUsage, RsaHashedImportParams, SignatureScheme, VerifyParams,
};
pub use error::{
    CryptoError,
    result::{CryptoResult, CryptoResultHelper},
};
pub use jwk::{Jwk, encode_integer};
pub use key::CryptoKey;
pub use provider::CryptoProvider;

pub use crate::openssl::{OpensslProvider, hashing_algorithm_to_openssl};

mod algorithm;
mod error;
mod jwk;
mod key;
mod openssl;
mod provider;

pub mod reexport {
    pub use openssl;
}
