//! Signature metadata: the detached attestation accompanying a bundle.
//!
//! Carried out-of-band by the transport as gateway response headers, never
//! inside the canonicalized bundle body.

use serde::{Deserialize, Serialize};

/// A detached bundle signature plus the id of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMetadata {
    /// The signature bytes, base64url-encoded without padding.
    pub signature: String,

    /// Key id of the signer, matched against the trust roots.
    pub kid: Option<String>,
}

impl SignatureMetadata {
    pub fn new(signature: impl Into<String>, kid: Option<String>) -> Self {
        Self {
            signature: signature.into(),
            kid,
        }
    }
}
