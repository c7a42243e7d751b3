//! Wycheproof RSA signature vector files.
//!
//! Both layouts of the C2SP/wycheproof repository are read: `testvectors`
//! (key as `keyJwk`, or hex `e`/`n` on the group) and `testvectors_v1`
//! (key as `publicKeyJwk`, or hex `publicKey.modulus`/`publicExponent`).

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use serde::Deserialize;
use tracing::{debug, warn};
use wycheproof_rsa_crypto::{HashAlgorithm, Jwk, SignatureScheme, encode_integer};

use crate::{
    corpus_ensure,
    error::result::{HarnessResult, HarnessResultHelper},
    test_case::{ExpectedResult, RsaSignatureTestCase},
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TestFile {
    algorithm: String,
    #[serde(default)]
    number_of_tests: Option<usize>,
    #[serde(default)]
    header: Vec<String>,
    #[serde(default)]
    notes: HashMap<String, serde_json::Value>,
    test_groups: Vec<TestGroup>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TestGroup {
    #[serde(rename = "type")]
    group_type: String,
    #[serde(default)]
    sha: String,
    #[serde(default)]
    mgf_sha: Option<String>,
    #[serde(default, rename = "sLen")]
    salt_length: Option<usize>,
    #[serde(default, alias = "keyJwk")]
    public_key_jwk: Option<Jwk>,
    #[serde(default)]
    public_key: Option<HexPublicKey>,
    #[serde(default)]
    e: Option<String>,
    #[serde(default)]
    n: Option<String>,
    tests: Vec<TestVector>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct HexPublicKey {
    #[serde(default)]
    modulus: Option<String>,
    #[serde(default)]
    public_exponent: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TestVector {
    tc_id: u64,
    #[serde(default)]
    comment: String,
    #[serde(default, with = "hex::serde")]
    msg: Vec<u8>,
    #[serde(default, with = "hex::serde")]
    sig: Vec<u8>,
    result: ExpectedResult,
    #[serde(default)]
    flags: Vec<String>,
}

/// A vector of the file, or the reason it cannot be run.
#[derive(Debug)]
pub enum CorpusEntry {
    Case(RsaSignatureTestCase),
    Skipped { id: u64, reason: String },
}

/// The content of one Wycheproof vector file.
#[derive(Debug)]
pub struct Corpus {
    pub algorithm: String,
    pub header: Vec<String>,
    /// Flag name to description.
    pub notes: HashMap<String, serde_json::Value>,
    pub entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Read a vector file from disk.
    ///
    /// # Errors
    /// I/O errors, malformed JSON or a file that is not an RSA signature file.
    pub fn load(path: &Path) -> HarnessResult<Self> {
        debug!("loading test vectors from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// # Errors
    /// Malformed JSON or a file that is not an RSA signature file.
    pub fn from_reader<R: Read>(reader: R) -> HarnessResult<Self> {
        let file: TestFile = serde_json::from_reader(reader)?;
        Self::from_test_file(file)
    }

    /// # Errors
    /// Malformed JSON or a file that is not an RSA signature file.
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        let file: TestFile = serde_json::from_str(json)?;
        Self::from_test_file(file)
    }

    fn from_test_file(file: TestFile) -> HarnessResult<Self> {
        corpus_ensure!(
            !file.test_groups.is_empty(),
            "{} vector file has no test group",
            file.algorithm
        );
        let mut entries = Vec::new();
        for group in file.test_groups {
            group_entries(group, &mut entries)?;
        }
        if let Some(expected) = file.number_of_tests {
            if expected != entries.len() {
                warn!(
                    "{}: header announces {expected} tests, {} found",
                    file.algorithm,
                    entries.len()
                );
            }
        }
        Ok(Self {
            algorithm: file.algorithm,
            header: file.header,
            notes: file.notes,
            entries,
        })
    }

    pub fn cases(&self) -> impl Iterator<Item = &RsaSignatureTestCase> {
        self.entries.iter().filter_map(|entry| match entry {
            CorpusEntry::Case(case) => Some(case),
            CorpusEntry::Skipped { .. } => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn group_entries(group: TestGroup, entries: &mut Vec<CorpusEntry>) -> HarnessResult<()> {
    let skip_all = |reason: String, entries: &mut Vec<CorpusEntry>, tests: Vec<TestVector>| {
        debug!("skipping {} vectors: {reason}", tests.len());
        entries.extend(tests.into_iter().map(|t| CorpusEntry::Skipped {
            id: t.tc_id,
            reason: reason.clone(),
        }));
    };

    let scheme = match group.group_type.as_str() {
        "RsassaPkcs1Verify" => SignatureScheme::RsassaPkcs1v15,
        "RsassaPssVerify" => SignatureScheme::RsaPss,
        other => {
            skip_all(
                format!("test group type {other} is not a signature verification"),
                entries,
                group.tests,
            );
            return Ok(());
        }
    };
    let Ok(hash_alg) = HashAlgorithm::from_str(&group.sha) else {
        skip_all(format!("unknown hash {:?}", group.sha), entries, group.tests);
        return Ok(());
    };
    if scheme == SignatureScheme::RsaPss {
        if let Some(mgf_sha) = group.mgf_sha.as_deref().filter(|m| *m != group.sha) {
            skip_all(
                format!("MGF1 hash {mgf_sha} differs from the message hash {}", group.sha),
                entries,
                group.tests,
            );
            return Ok(());
        }
    }
    let (e, n) = group_key(&group)?;

    for test in group.tests {
        let mut case = RsaSignatureTestCase::new(
            test.tc_id,
            e.clone(),
            n.clone(),
            hash_alg,
            scheme,
            test.msg,
            test.sig,
            test.result,
        )
        .with_comment(test.comment, test.flags);
        if let (SignatureScheme::RsaPss, Some(salt_length)) = (scheme, group.salt_length) {
            case = case.with_salt_length(salt_length);
        }
        entries.push(CorpusEntry::Case(case));
    }
    Ok(())
}

/// Base64url `(e, n)` of the group key.
fn group_key(group: &TestGroup) -> HarnessResult<(String, String)> {
    if let Some(jwk) = &group.public_key_jwk {
        return Ok((jwk.e.clone(), jwk.n.clone()));
    }
    let (e, n) = match &group.public_key {
        Some(key) => (key.public_exponent.as_deref(), key.modulus.as_deref()),
        None => (group.e.as_deref(), group.n.as_deref()),
    };
    let e = e.context("test group has no public exponent")?;
    let n = n.context("test group has no modulus")?;
    Ok((encode_integer(&hex::decode(e)?), encode_integer(&hex::decode(n)?)))
}
