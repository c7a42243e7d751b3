use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};
use wycheproof_rsa_crypto::{
    CryptoKey, CryptoProvider, CryptoResult, HashAlgorithm, Jwk, KeyFormat, KeyUsage,
    RsaHashedImportParams, SignatureScheme, VerifyParams, hashing_algorithm_to_openssl,
};

use crate::error::{HarnessError, result::HarnessResult};

/// Outcome a test vector expects from a conforming implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExpectedResult {
    Valid,
    Invalid,
    /// Either answer is tolerated: the vector probes a known weakness the
    /// implementation may or may not reject.
    Acceptable,
}

/// Progress of a test case. Transitions only move forward.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum CaseState {
    Created,
    Importing,
    Imported,
    Verifying,
    Passed,
    Failed,
}

/// How a passing case passed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum Verdict {
    /// Verification returned true.
    Accepted,
    /// Verification returned false.
    Rejected,
    /// The provider refused to verify with an invalid access error.
    Refused,
}

/// One Wycheproof RSA signature vector, and the key imported for it.
#[derive(Debug)]
pub struct RsaSignatureTestCase {
    pub id: u64,
    /// Public exponent, base64url.
    pub e: String,
    /// Modulus, base64url.
    pub n: String,
    pub hash_alg: HashAlgorithm,
    pub scheme: SignatureScheme,
    /// PSS salt length; the digest length when absent.
    pub salt_length: Option<usize>,
    pub msg: Vec<u8>,
    pub sig: Vec<u8>,
    pub result: ExpectedResult,
    pub comment: String,
    pub flags: Vec<String>,
    pk: Option<CryptoKey>,
    state: CaseState,
}

impl RsaSignatureTestCase {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: u64,
        e: impl Into<String>,
        n: impl Into<String>,
        hash_alg: HashAlgorithm,
        scheme: SignatureScheme,
        msg: Vec<u8>,
        sig: Vec<u8>,
        result: ExpectedResult,
    ) -> Self {
        Self {
            id,
            e: e.into(),
            n: n.into(),
            hash_alg,
            scheme,
            salt_length: None,
            msg,
            sig,
            result,
            comment: String::new(),
            flags: Vec::new(),
            pk: None,
            state: CaseState::Created,
        }
    }

    #[must_use]
    pub const fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = Some(salt_length);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>, flags: Vec<String>) -> Self {
        self.comment = comment.into();
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn state(&self) -> CaseState {
        self.state
    }

    /// The imported key handle, once the import phase succeeded.
    #[must_use]
    pub const fn key(&self) -> Option<&CryptoKey> {
        self.pk.as_ref()
    }

    /// Key material handed to the provider: an exportable RSA JWK.
    #[must_use]
    pub fn jwk(&self) -> Jwk {
        Jwk::rsa_public(&self.e, &self.n)
    }

    #[must_use]
    pub const fn import_params(&self) -> RsaHashedImportParams {
        RsaHashedImportParams {
            name: self.scheme,
            hash: self.hash_alg,
        }
    }

    #[must_use]
    pub fn verify_params(&self) -> VerifyParams {
        match self.scheme {
            SignatureScheme::RsassaPkcs1v15 => VerifyParams::RsassaPkcs1v15,
            SignatureScheme::RsaPss => VerifyParams::RsaPss {
                salt_length: self
                    .salt_length
                    .unwrap_or_else(|| hashing_algorithm_to_openssl(self.hash_alg).size()),
            },
        }
    }

    /// Import phase: import the case key for verification only.
    ///
    /// An unsupported hash fails the case before the provider is asked to
    /// import anything. An import failure always fails the case, whatever
    /// result the vector expects.
    ///
    /// # Errors
    /// `AlreadyImported`, `UnsupportedHash` or `Import`.
    pub fn import_key<P>(&mut self, provider: &P) -> HarnessResult<()>
    where
        P: CryptoProvider + ?Sized,
    {
        self.begin_import(provider)?;
        match provider.import_key(
            KeyFormat::Jwk,
            &self.jwk(),
            self.import_params(),
            false,
            &[KeyUsage::Verify],
        ) {
            Ok(key) => {
                self.pk = Some(key);
                self.state = CaseState::Imported;
                Ok(())
            }
            Err(source) => {
                warn!("test case {}: key import failed: {source}", self.id);
                self.state = CaseState::Failed;
                Err(HarnessError::Import {
                    id: self.id,
                    source,
                })
            }
        }
    }

    /// Import phase served from an already imported handle for the same key.
    pub(crate) fn attach_key<P>(&mut self, provider: &P, key: CryptoKey) -> HarnessResult<()>
    where
        P: CryptoProvider + ?Sized,
    {
        self.begin_import(provider)?;
        self.pk = Some(key);
        self.state = CaseState::Imported;
        Ok(())
    }

    fn begin_import<P>(&mut self, provider: &P) -> HarnessResult<()>
    where
        P: CryptoProvider + ?Sized,
    {
        if self.pk.is_some() || self.state != CaseState::Created {
            return Err(HarnessError::AlreadyImported { id: self.id });
        }
        self.state = CaseState::Importing;
        if !provider.is_supported(self.hash_alg) {
            self.state = CaseState::Failed;
            return Err(HarnessError::UnsupportedHash {
                id: self.id,
                hash: self.hash_alg,
            });
        }
        Ok(())
    }

    /// Verification phase: verify the signature and compare with the expected result.
    ///
    /// # Errors
    /// `NotImported` or `InvalidState` when called out of order, otherwise
    /// `Mismatch` or `UnexpectedError` when the outcome contradicts the vector.
    pub fn verify<P>(&mut self, provider: &P) -> HarnessResult<Verdict>
    where
        P: CryptoProvider + ?Sized,
    {
        let Some(key) = self.pk.as_ref() else {
            return Err(HarnessError::NotImported { id: self.id });
        };
        if self.state != CaseState::Imported {
            return Err(HarnessError::InvalidState {
                id: self.id,
                state: self.state,
            });
        }
        self.state = CaseState::Verifying;
        let outcome = provider.verify(&self.verify_params(), key, &self.sig, &self.msg);
        let verdict = check_outcome(self.id, self.result, outcome);
        self.state = if verdict.is_ok() {
            CaseState::Passed
        } else {
            CaseState::Failed
        };
        match &verdict {
            Ok(v) => debug!("test case {}: {} signature {v}", self.id, self.result),
            Err(e) => warn!("{e} ({})", self.comment),
        }
        verdict
    }

    /// Import then verify. Verification never starts if the import failed.
    ///
    /// # Errors
    /// Any error of [`Self::import_key`] or [`Self::verify`].
    pub fn run<P>(&mut self, provider: &P) -> HarnessResult<Verdict>
    where
        P: CryptoProvider + ?Sized,
    {
        self.import_key(provider)?;
        self.verify(provider)
    }
}

/// Compare a verification outcome with the result the vector expects.
///
/// A provider error is tolerated only for vectors that are not `valid`, and
/// only when it is an invalid access error.
///
/// # Errors
/// `Mismatch` or `UnexpectedError` when the outcome contradicts `expected`.
pub fn check_outcome(
    id: u64,
    expected: ExpectedResult,
    outcome: CryptoResult<bool>,
) -> HarnessResult<Verdict> {
    match outcome {
        Ok(verified) => match (expected, verified) {
            (ExpectedResult::Valid | ExpectedResult::Acceptable, true) => Ok(Verdict::Accepted),
            (ExpectedResult::Invalid | ExpectedResult::Acceptable, false) => Ok(Verdict::Rejected),
            (ExpectedResult::Valid, false) | (ExpectedResult::Invalid, true) => {
                Err(HarnessError::Mismatch {
                    id,
                    expected,
                    verified,
                })
            }
        },
        Err(source) => match expected {
            ExpectedResult::Invalid | ExpectedResult::Acceptable if source.is_invalid_access() => {
                Ok(Verdict::Refused)
            }
            ExpectedResult::Valid | ExpectedResult::Invalid | ExpectedResult::Acceptable => {
                Err(HarnessError::UnexpectedError {
                    id,
                    expected,
                    source,
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use wycheproof_rsa_crypto::CryptoError;

    use super::{ExpectedResult, Verdict, check_outcome};
    use crate::HarnessError;

    fn access() -> CryptoError {
        CryptoError::InvalidAccess("signature too short".to_owned())
    }

    fn operation() -> CryptoError {
        CryptoError::OpenSSL("internal".to_owned())
    }

    #[test]
    fn test_valid_vectors() {
        assert_eq!(
            check_outcome(1, ExpectedResult::Valid, Ok(true)).ok(),
            Some(Verdict::Accepted)
        );
        assert!(matches!(
            check_outcome(1, ExpectedResult::Valid, Ok(false)),
            Err(HarnessError::Mismatch { id: 1, .. })
        ));
        assert!(matches!(
            check_outcome(1, ExpectedResult::Valid, Err(access())),
            Err(HarnessError::UnexpectedError { id: 1, .. })
        ));
        assert!(matches!(
            check_outcome(1, ExpectedResult::Valid, Err(operation())),
            Err(HarnessError::UnexpectedError { .. })
        ));
    }

    #[test]
    fn test_invalid_vectors() {
        assert_eq!(
            check_outcome(2, ExpectedResult::Invalid, Ok(false)).ok(),
            Some(Verdict::Rejected)
        );
        assert_eq!(
            check_outcome(2, ExpectedResult::Invalid, Err(access())).ok(),
            Some(Verdict::Refused)
        );
        assert!(matches!(
            check_outcome(2, ExpectedResult::Invalid, Ok(true)),
            Err(HarnessError::Mismatch { id: 2, verified: true, .. })
        ));
        assert!(matches!(
            check_outcome(2, ExpectedResult::Invalid, Err(operation())),
            Err(HarnessError::UnexpectedError { id: 2, .. })
        ));
    }

    #[test]
    fn test_acceptable_vectors() {
        assert_eq!(
            check_outcome(3, ExpectedResult::Acceptable, Ok(true)).ok(),
            Some(Verdict::Accepted)
        );
        assert_eq!(
            check_outcome(3, ExpectedResult::Acceptable, Ok(false)).ok(),
            Some(Verdict::Rejected)
        );
        assert_eq!(
            check_outcome(3, ExpectedResult::Acceptable, Err(access())).ok(),
            Some(Verdict::Refused)
        );
        assert!(
            check_outcome(
                3,
                ExpectedResult::Acceptable,
                Err(CryptoError::NotSupported("hash".to_owned()))
            )
            .is_err()
        );
    }

    #[test]
    fn test_expected_result_names() {
        let parsed: Vec<ExpectedResult> =
            serde_json::from_str(r#"["valid", "invalid", "acceptable"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ExpectedResult::Valid,
                ExpectedResult::Invalid,
                ExpectedResult::Acceptable
            ]
        );
        assert_eq!(ExpectedResult::Acceptable.to_string(), "acceptable");
    }
}
