#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{CountingProvider, SigningKey};
use openssl::hash::MessageDigest;
use wycheproof_rsa_harness::{
    CaseState, ExpectedResult, HarnessError, KeyCache, RsaSignatureTestCase, Verdict,
    reexport::wycheproof_rsa_crypto::{
        CryptoError, HashAlgorithm, OpensslProvider, SignatureScheme,
    },
};
use wycheproof_rsa_logger::log_init;

const MSG: &[u8] = b"Wycheproof RSA signature";

fn pkcs1_case(
    id: u64,
    key: &SigningKey,
    sig: Vec<u8>,
    result: ExpectedResult,
) -> RsaSignatureTestCase {
    RsaSignatureTestCase::new(
        id,
        key.e.clone(),
        key.n.clone(),
        HashAlgorithm::Sha256,
        SignatureScheme::RsassaPkcs1v15,
        MSG.to_vec(),
        sig,
        result,
    )
}

#[test]
fn valid_pkcs1_signature_verifies() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);

    let mut case = pkcs1_case(1, &key, sig, ExpectedResult::Valid);
    assert_eq!(case.state(), CaseState::Created);
    assert!(case.key().is_none());

    case.import_key(&provider).unwrap();
    assert_eq!(case.state(), CaseState::Imported);
    let handle = case.key().unwrap();
    assert_eq!(handle.modulus_bits(), 2048);
    assert!(!handle.extractable());

    assert_eq!(case.verify(&provider).unwrap(), Verdict::Accepted);
    assert_eq!(case.state(), CaseState::Passed);
}

#[test]
fn flipped_last_byte_is_rejected_not_refused() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let mut sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    let last = sig.len() - 1;
    sig[last] ^= 0x80;

    let mut case = pkcs1_case(2, &key, sig, ExpectedResult::Invalid);
    assert_eq!(case.run(&provider).unwrap(), Verdict::Rejected);
    assert_eq!(case.state(), CaseState::Passed);
}

#[test]
fn unsupported_hash_fails_before_import() {
    log_init(None);
    let provider = CountingProvider::default();
    let key = SigningKey::generate(2048);
    let mut case = RsaSignatureTestCase::new(
        3,
        key.e.clone(),
        key.n.clone(),
        HashAlgorithm::Md5,
        SignatureScheme::RsassaPkcs1v15,
        MSG.to_vec(),
        vec![0_u8; 256],
        ExpectedResult::Valid,
    );

    let err = case.run(&provider).unwrap_err();
    assert!(
        matches!(err, HarnessError::UnsupportedHash { id: 3, hash: HashAlgorithm::Md5 }),
        "{err}"
    );
    assert_eq!(case.state(), CaseState::Failed);
    assert!(case.key().is_none());
    assert_eq!(provider.imports(), 0);
    assert_eq!(provider.verifications(), 0);
}

#[test]
fn truncated_signature_refused_with_invalid_access() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let mut sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    sig.truncate(sig.len() - 1);

    let mut invalid = pkcs1_case(4, &key, sig.clone(), ExpectedResult::Invalid);
    assert_eq!(invalid.run(&provider).unwrap(), Verdict::Refused);
    assert_eq!(invalid.state(), CaseState::Passed);

    let mut acceptable = pkcs1_case(5, &key, sig.clone(), ExpectedResult::Acceptable);
    assert_eq!(acceptable.run(&provider).unwrap(), Verdict::Refused);

    // a provider error is never tolerated for a valid vector
    let mut valid = pkcs1_case(6, &key, sig, ExpectedResult::Valid);
    let err = valid.run(&provider).unwrap_err();
    assert!(
        matches!(
            &err,
            HarnessError::UnexpectedError {
                id: 6,
                expected: ExpectedResult::Valid,
                source: CryptoError::InvalidAccess(_)
            }
        ),
        "{err}"
    );
    assert_eq!(valid.state(), CaseState::Failed);
}

#[test]
fn acceptable_tolerates_both_answers() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    let mut forged = sig.clone();
    forged[0] ^= 0x01;

    let mut good = pkcs1_case(7, &key, sig, ExpectedResult::Acceptable);
    assert_eq!(good.run(&provider).unwrap(), Verdict::Accepted);
    let mut bad = pkcs1_case(8, &key, forged, ExpectedResult::Acceptable);
    assert_eq!(bad.run(&provider).unwrap(), Verdict::Rejected);
}

#[test]
fn mislabelled_vectors_fail() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    let mut forged = sig.clone();
    forged[10] ^= 0x01;

    let mut valid_labelled_invalid = pkcs1_case(9, &key, sig, ExpectedResult::Invalid);
    let err = valid_labelled_invalid.run(&provider).unwrap_err();
    assert!(
        matches!(err, HarnessError::Mismatch { id: 9, verified: true, .. }),
        "{err}"
    );
    assert_eq!(valid_labelled_invalid.state(), CaseState::Failed);

    let mut forged_labelled_valid = pkcs1_case(10, &key, forged, ExpectedResult::Valid);
    assert!(matches!(
        forged_labelled_valid.run(&provider),
        Err(HarnessError::Mismatch { id: 10, verified: false, .. })
    ));
}

#[test]
fn import_failure_is_fatal_whatever_the_label() {
    log_init(None);
    let provider = CountingProvider::default();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);

    for (id, result) in [
        (11, ExpectedResult::Valid),
        (12, ExpectedResult::Invalid),
        (13, ExpectedResult::Acceptable),
    ] {
        let mut case = RsaSignatureTestCase::new(
            id,
            key.e.clone(),
            "AAAA",
            HashAlgorithm::Sha256,
            SignatureScheme::RsassaPkcs1v15,
            MSG.to_vec(),
            sig.clone(),
            result,
        );
        let err = case.run(&provider).unwrap_err();
        assert!(
            matches!(&err, HarnessError::Import { id: failed, source: CryptoError::Data(_) } if *failed == id),
            "{err}"
        );
        assert!(err.to_string().starts_with(&format!("test case {id}:")));
        assert_eq!(case.state(), CaseState::Failed);
    }
    assert_eq!(provider.imports(), 3);
    assert_eq!(provider.verifications(), 0);
}

#[test]
fn phases_only_move_forward() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    let mut case = pkcs1_case(14, &key, sig, ExpectedResult::Valid);

    assert!(matches!(
        case.verify(&provider),
        Err(HarnessError::NotImported { id: 14 })
    ));
    assert_eq!(case.state(), CaseState::Created);

    case.import_key(&provider).unwrap();
    assert!(matches!(
        case.import_key(&provider),
        Err(HarnessError::AlreadyImported { id: 14 })
    ));
    assert_eq!(case.state(), CaseState::Imported);

    assert_eq!(case.verify(&provider).unwrap(), Verdict::Accepted);
    assert!(matches!(
        case.verify(&provider),
        Err(HarnessError::InvalidState {
            id: 14,
            state: CaseState::Passed
        })
    ));
}

#[test]
fn rerunning_a_case_gives_the_same_outcome() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);
    let mut forged = sig.clone();
    forged[20] ^= 0x04;

    for _ in 0..2 {
        let mut case = pkcs1_case(15, &key, sig.clone(), ExpectedResult::Valid);
        assert_eq!(case.run(&provider).unwrap(), Verdict::Accepted);
        let mut case = pkcs1_case(16, &key, forged.clone(), ExpectedResult::Invalid);
        assert_eq!(case.run(&provider).unwrap(), Verdict::Rejected);
    }
}

#[test]
fn pss_salt_length_defaults_to_digest_length() {
    log_init(None);
    let provider = OpensslProvider::new();
    let key = SigningKey::generate(2048);
    let pss_case = |id, sig, salt_length: Option<usize>, result| {
        let case = RsaSignatureTestCase::new(
            id,
            key.e.clone(),
            key.n.clone(),
            HashAlgorithm::Sha384,
            SignatureScheme::RsaPss,
            MSG.to_vec(),
            sig,
            result,
        );
        match salt_length {
            Some(len) => case.with_salt_length(len),
            None => case,
        }
    };

    let salted = key.sign_pss(MessageDigest::sha384(), 48, MSG);
    let mut case = pss_case(17, salted.clone(), None, ExpectedResult::Valid);
    assert_eq!(case.run(&provider).unwrap(), Verdict::Accepted);

    let unsalted = key.sign_pss(MessageDigest::sha384(), 0, MSG);
    let mut case = pss_case(18, unsalted.clone(), Some(0), ExpectedResult::Valid);
    assert_eq!(case.run(&provider).unwrap(), Verdict::Accepted);
    let mut case = pss_case(19, unsalted, None, ExpectedResult::Invalid);
    assert_eq!(case.run(&provider).unwrap(), Verdict::Rejected);

    // a PSS signature checked under a PKCS#1 v1.5 key does not verify
    let mut case = RsaSignatureTestCase::new(
        20,
        key.e.clone(),
        key.n.clone(),
        HashAlgorithm::Sha384,
        SignatureScheme::RsassaPkcs1v15,
        MSG.to_vec(),
        salted,
        ExpectedResult::Invalid,
    );
    assert_eq!(case.run(&provider).unwrap(), Verdict::Rejected);
}

#[test]
fn key_cache_imports_each_key_once() {
    log_init(None);
    let provider = CountingProvider::default();
    let key = SigningKey::generate(2048);
    let other = SigningKey::generate(2048);
    let sig = key.sign_pkcs1(MessageDigest::sha256(), MSG);

    let mut cache = KeyCache::new();
    assert!(cache.is_empty());
    let mut first = pkcs1_case(21, &key, sig.clone(), ExpectedResult::Valid);
    let mut second = pkcs1_case(22, &key, sig.clone(), ExpectedResult::Valid);
    let mut foreign = pkcs1_case(23, &other, sig, ExpectedResult::Invalid);
    for case in [&mut first, &mut second, &mut foreign] {
        cache.import_key(case, &provider).unwrap();
        assert_eq!(case.state(), CaseState::Imported);
    }
    assert_eq!(provider.imports(), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.hits(), 1);

    assert_eq!(first.verify(&provider).unwrap(), Verdict::Accepted);
    assert_eq!(second.verify(&provider).unwrap(), Verdict::Accepted);
    assert_eq!(foreign.verify(&provider).unwrap(), Verdict::Rejected);

    // unsupported hashes still fail before any import
    let mut md5 = RsaSignatureTestCase::new(
        24,
        key.e.clone(),
        key.n.clone(),
        HashAlgorithm::Md5,
        SignatureScheme::RsassaPkcs1v15,
        MSG.to_vec(),
        Vec::new(),
        ExpectedResult::Invalid,
    );
    assert!(matches!(
        cache.import_key(&mut md5, &provider),
        Err(HarnessError::UnsupportedHash { id: 24, .. })
    ));
}
