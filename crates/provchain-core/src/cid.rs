//! Content identifiers: SHA-256 addressing of canonical bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::canonical::canonical_bytes;
use crate::error::{CanonicalizationError, CidParseError};

/// The algorithm tag carried in every CID string.
pub const CID_ALGORITHM: &str = "sha256";

/// A content identifier: `sha256:` followed by 64 lowercase hex characters.
///
/// Two distinct byte sequences collide only with cryptographically
/// negligible probability, so a CID names its content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

impl Cid {
    /// Address a byte sequence. Pure: same input, same CID.
    pub fn address(bytes: &[u8]) -> Self {
        let digest: [u8; 32] = Sha256::digest(bytes).into();
        Self::from_digest(digest)
    }

    /// Build a CID from an already-computed SHA-256 digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(format!("{}:{}", CID_ALGORITHM, hex::encode(digest)))
    }

    /// The full CID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({}...)", &self.0[..15.min(self.0.len())])
    }
}

impl FromStr for Cid {
    type Err = CidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, digest) = s
            .split_once(':')
            .ok_or_else(|| CidParseError::UnknownAlgorithm(s.to_string()))?;
        if algorithm != CID_ALGORITHM {
            return Err(CidParseError::UnknownAlgorithm(algorithm.to_string()));
        }
        let well_formed = digest.len() == 64
            && digest
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(CidParseError::InvalidDigest);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Cid {
    type Error = CidParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

/// Canonicalize a JSON value and address the resulting bytes.
pub fn cid_of_value(value: &serde_json::Value) -> Result<Cid, CanonicalizationError> {
    Ok(Cid::address(&canonical_bytes(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_known_vectors() {
        assert_eq!(
            Cid::address(b"").as_str(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            Cid::address(b"abc").as_str(),
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            Cid::address(b"hello").as_str(),
            "sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_address_deterministic() {
        let bytes = br#"{"chain":[],"trace_id":"t1"}"#;
        assert_eq!(Cid::address(bytes), Cid::address(bytes));
        assert_ne!(Cid::address(b"a"), Cid::address(b"b"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let cid = Cid::address(b"payload");
        let parsed: Cid = cid.as_str().parse().unwrap();
        assert_eq!(cid, parsed);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "no-colon-here".parse::<Cid>(),
            Err(CidParseError::UnknownAlgorithm("no-colon-here".to_string()))
        );
        assert_eq!(
            "blake3:0000".parse::<Cid>(),
            Err(CidParseError::UnknownAlgorithm("blake3".to_string()))
        );
        assert_eq!("sha256:zz".parse::<Cid>(), Err(CidParseError::InvalidDigest));
        let upper = format!("sha256:{}", "A".repeat(64));
        assert_eq!(upper.parse::<Cid>(), Err(CidParseError::InvalidDigest));
    }

    #[test]
    fn test_cid_of_value_key_order_invariant() {
        let v1: serde_json::Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        let v2: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(cid_of_value(&v1).unwrap(), cid_of_value(&v2).unwrap());
        assert_ne!(
            cid_of_value(&json!({"a": 1})).unwrap(),
            cid_of_value(&json!({"a": 2})).unwrap()
        );
    }

    #[test]
    fn test_serde_validates() {
        let cid = Cid::address(b"x");
        let text = serde_json::to_string(&cid).unwrap();
        let back: Cid = serde_json::from_str(&text).unwrap();
        assert_eq!(cid, back);

        let bad: Result<Cid, _> = serde_json::from_str(r#""md5:abc""#);
        assert!(bad.is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_address_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(Cid::address(&bytes), Cid::address(&bytes));
            }

            #[test]
            fn prop_parse_roundtrip(digest in any::<[u8; 32]>()) {
                let cid = Cid::from_digest(digest);
                prop_assert_eq!(cid.as_str().parse::<Cid>().unwrap(), cid);
            }
        }
    }
}
