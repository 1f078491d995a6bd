//! Stored issuer records.
//!
//! These are the storage-side shapes. API payloads live in
//! [`crate::registry::dto`] and are converted by [`crate::registry::mapper`].

use serde::{Deserialize, Serialize};

/// A trusted issuer, keyed by its DID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedIssuer {
    pub did: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// A credential type the issuer is trusted to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub credentials_type: Option<String>,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

/// Restriction on one claim of the credentials the issuer may sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub values: Vec<ClaimValue>,
}

/// One allowed value, kept as serialized JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimValue(pub String);

/// Structural DID check: `did:<method>:<id...>`. Does not resolve anything.
pub fn is_did(candidate: &str) -> bool {
    let mut parts = candidate.splitn(3, ':');
    parts.next() == Some("did")
        && parts.next().is_some_and(|method| !method.is_empty())
        && parts.next().is_some_and(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_structure() {
        assert!(is_did("did:web:example.org"));
        assert!(is_did("did:key:z6Mk:extra"));
        assert!(!is_did("did:elsi:"));
        assert!(!is_did("did::x"));
        assert!(!is_did("did:web"));
        assert!(!is_did("web:example:org"));
        assert!(!is_did("DID:web:example.org"));
        assert!(!is_did(""));
    }
}
