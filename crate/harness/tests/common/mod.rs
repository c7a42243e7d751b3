#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use openssl::{
    hash::MessageDigest,
    pkey::{PKey, Private},
    rsa::{Padding, Rsa},
    sign::{RsaPssSaltlen, Signer},
};
use wycheproof_rsa_harness::reexport::wycheproof_rsa_crypto::{
    CryptoKey, CryptoProvider, CryptoResult, HashAlgorithm, Jwk, KeyFormat, KeyUsage,
    OpensslProvider, RsaHashedImportParams, VerifyParams, encode_integer,
};

/// A freshly generated RSA key pair and its public JWK members.
pub struct SigningKey {
    pkey: PKey<Private>,
    pub e: String,
    pub n: String,
}

impl SigningKey {
    pub fn generate(bits: u32) -> Self {
        let rsa = Rsa::generate(bits).unwrap();
        let e = encode_integer(&rsa.e().to_vec());
        let n = encode_integer(&rsa.n().to_vec());
        Self {
            pkey: PKey::from_rsa(rsa).unwrap(),
            e,
            n,
        }
    }

    pub fn exponent_hex(&self) -> String {
        hex::encode(self.pkey.rsa().unwrap().e().to_vec())
    }

    pub fn modulus_hex(&self) -> String {
        // Wycheproof prefixes the modulus with a zero byte
        format!("00{}", hex::encode(self.pkey.rsa().unwrap().n().to_vec()))
    }

    pub fn sign_pkcs1(&self, md: MessageDigest, msg: &[u8]) -> Vec<u8> {
        let mut signer = Signer::new(md, &self.pkey).unwrap();
        signer.set_rsa_padding(Padding::PKCS1).unwrap();
        signer.sign_oneshot_to_vec(msg).unwrap()
    }

    pub fn sign_pss(&self, md: MessageDigest, salt_length: i32, msg: &[u8]) -> Vec<u8> {
        let mut signer = Signer::new(md, &self.pkey).unwrap();
        signer.set_rsa_padding(Padding::PKCS1_PSS).unwrap();
        signer.set_rsa_mgf1_md(md).unwrap();
        signer
            .set_rsa_pss_saltlen(RsaPssSaltlen::custom(salt_length))
            .unwrap();
        signer.sign_oneshot_to_vec(msg).unwrap()
    }
}

/// Delegates to OpenSSL and counts the calls reaching the provider.
#[derive(Default)]
pub struct CountingProvider {
    inner: OpensslProvider,
    pub imports: AtomicUsize,
    pub verifications: AtomicUsize,
}

impl CountingProvider {
    pub fn imports(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl CryptoProvider for CountingProvider {
    fn is_supported(&self, hash: HashAlgorithm) -> bool {
        self.inner.is_supported(hash)
    }

    fn import_key(
        &self,
        format: KeyFormat,
        key_material: &Jwk,
        algorithm: RsaHashedImportParams,
        extractable: bool,
        usages: &[KeyUsage],
    ) -> CryptoResult<CryptoKey> {
        self.imports.fetch_add(1, Ordering::SeqCst);
        self.inner
            .import_key(format, key_material, algorithm, extractable, usages)
    }

    fn verify(
        &self,
        params: &VerifyParams,
        key: &CryptoKey,
        signature: &[u8],
        message: &[u8],
    ) -> CryptoResult<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(params, key, signature, message)
    }
}
