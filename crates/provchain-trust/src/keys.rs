//! Trust roots: the Ed25519 keys a verifier accepts signatures from.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use serde_json::Value;
use std::fmt;

use crate::error::{Result, TrustError};

/// Decode base64url, tolerating trailing padding and surrounding whitespace.
pub(crate) fn decode_b64u(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.trim().trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| TrustError::InvalidEncoding(e.to_string()))
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a JWK `x` parameter (base64url key bytes).
    pub fn from_jwk_x(x: &str) -> Result<Self> {
        let bytes = decode_b64u(x)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TrustError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<()> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| TrustError::InvalidPublicKey)?;
        let sig = DalekSignature::from_bytes(&signature.0);
        verifying_key
            .verify(message, &sig)
            .map_err(|_| TrustError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Encode as base64url without padding (the wire form).
    pub fn to_b64u(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Decode from base64url.
    pub fn from_b64u(s: &str) -> Result<Self> {
        let bytes = decode_b64u(s)?;
        let arr: [u8; 64] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TrustError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &hex::encode(&self.0[..8]))
    }
}

/// A keypair for signing bundles (test fixtures and emitting pipelines).
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

/// One trust root entry: a key and its optional key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    pub kid: Option<String>,
    pub key: Ed25519PublicKey,
}

/// The explicit set of keys a verifier trusts.
///
/// Passed into the orchestrator at construction; never read from ambient
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustedKeys {
    keys: Vec<TrustedKey>,
}

impl TrustedKeys {
    /// An empty trust set. Every signature fails against it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from explicit entries.
    pub fn new(keys: Vec<TrustedKey>) -> Self {
        Self { keys }
    }

    /// A single-key trust set.
    pub fn single(kid: impl Into<String>, key: Ed25519PublicKey) -> Self {
        Self {
            keys: vec![TrustedKey {
                kid: Some(kid.into()),
                key,
            }],
        }
    }

    /// Load Ed25519 keys from a JWKS-style document.
    ///
    /// Entries that are not `OKP`/`Ed25519` are skipped (a mixed JWKS may
    /// carry keys for other algorithms); an undecodable Ed25519 entry is an
    /// error, since a corrupt trust root should be loud.
    pub fn from_jwks(doc: &Value) -> Result<Self> {
        let entries = doc
            .get("keys")
            .and_then(Value::as_array)
            .ok_or(TrustError::MalformedJwks)?;

        let mut keys = Vec::new();
        for entry in entries {
            let kty = entry.get("kty").and_then(Value::as_str);
            let crv = entry.get("crv").and_then(Value::as_str);
            if kty != Some("OKP") || crv != Some("Ed25519") {
                continue;
            }
            let x = entry
                .get("x")
                .and_then(Value::as_str)
                .ok_or(TrustError::MalformedJwks)?;
            keys.push(TrustedKey {
                kid: entry
                    .get("kid")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                key: Ed25519PublicKey::from_jwk_x(x)?,
            });
        }

        Ok(Self { keys })
    }

    /// Look up the key for a signature.
    ///
    /// With a `kid`, only an entry carrying that id matches. Without one,
    /// the first key is used.
    pub fn lookup(&self, kid: Option<&str>) -> Option<&TrustedKey> {
        match kid {
            Some(kid) => self.keys.iter().find(|k| k.kid.as_deref() == Some(kid)),
            None => self.keys.first(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustedKey> {
        self.keys.iter()
    }
}
