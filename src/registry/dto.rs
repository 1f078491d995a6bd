//! API payloads.
//!
//! Two shapes are exposed: the proprietary trusted issuers list (TIL), which
//! carries full capability details, and the EBSI-compatible trusted issuers
//! registry (TIR, v4), which carries hashed, base64 encoded attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// TIL issuer payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedIssuerDto {
    pub did: Option<String>,
    #[serde(default)]
    pub credentials: Vec<CredentialsDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<TimeRangeDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_type: Option<String>,
    #[serde(default)]
    pub claims: Vec<ClaimDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRangeDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub allowed_values: Vec<Value>,
}

/// TIR issuer payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDto {
    pub did: String,
    pub attributes: Vec<IssuerAttributeDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerAttributeDto {
    /// base64(SHA-256(body bytes)).
    pub hash: String,
    /// base64 of the JSON encoded capability.
    pub body: String,
    pub issuer_type: IssuerType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuerType {
    #[serde(rename = "RootTAO")]
    RootTao,
    #[serde(rename = "TAO")]
    Tao,
    #[serde(rename = "TI")]
    Ti,
    Revoked,
    Undefined,
}

/// TIR listing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuersResponse {
    pub items: Vec<IssuerEntry>,
    pub total: usize,
    pub page_size: usize,
    #[serde(rename = "self")]
    pub self_link: String,
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerEntry {
    pub did: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_til_payload_shape() {
        let dto: TrustedIssuerDto = serde_json::from_value(json!({
            "did": "did:web:happypets.org",
            "credentials": [{
                "validFor": {"from": "2017-07-21T17:32:28Z", "to": "2023-07-21T17:32:28Z"},
                "credentialsType": "CustomerCredential",
                "claims": [{"name": "roles", "allowedValues": ["GOLD_CUSTOMER", 1, true, {"a": "b"}]}]
            }]
        }))
        .unwrap();
        assert_eq!(dto.did.as_deref(), Some("did:web:happypets.org"));
        let credential = &dto.credentials[0];
        assert_eq!(credential.credentials_type.as_deref(), Some("CustomerCredential"));
        assert_eq!(
            credential.valid_for.as_ref().and_then(|v| v.to.as_deref()),
            Some("2023-07-21T17:32:28Z")
        );
        assert_eq!(credential.claims[0].allowed_values.len(), 4);
    }

    #[test]
    fn test_missing_did_is_accepted_by_serde() {
        let dto: TrustedIssuerDto = serde_json::from_value(json!({"credentials": []})).unwrap();
        assert_eq!(dto.did, None);
    }

    #[test]
    fn test_listing_field_names() {
        let response = IssuersResponse {
            items: vec![],
            total: 0,
            page_size: 0,
            self_link: "http://localhost/v4/issuers/".into(),
            links: Links::default(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "items": [],
                "total": 0,
                "pageSize": 0,
                "self": "http://localhost/v4/issuers/",
                "links": {"first": null, "prev": null, "next": null}
            })
        );
    }

    #[test]
    fn test_issuer_type_wire_name() {
        assert_eq!(serde_json::to_value(IssuerType::Undefined).unwrap(), json!("Undefined"));
        assert_eq!(serde_json::to_value(IssuerType::RootTao).unwrap(), json!("RootTAO"));
    }
}
