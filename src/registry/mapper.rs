//! Conversion between stored records and API payloads.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::registry::dto::{
    ClaimDto, CredentialsDto, IssuerAttributeDto, IssuerDto, IssuerType, TimeRangeDto,
    TrustedIssuerDto,
};
use crate::registry::model::{Capability, Claim, ClaimValue, TrustedIssuer};

/// Build a stored issuer from a TIL payload. The DID is passed separately
/// because the caller has already checked it.
pub fn issuer_from_dto(did: String, dto: TrustedIssuerDto) -> TrustedIssuer {
    TrustedIssuer {
        did,
        capabilities: dto.credentials.into_iter().map(capability_from_dto).collect(),
    }
}

fn capability_from_dto(dto: CredentialsDto) -> Capability {
    let (valid_from, valid_to) = match dto.valid_for {
        Some(range) => (range.from, range.to),
        None => (None, None),
    };
    Capability {
        valid_from,
        valid_to,
        credentials_type: dto.credentials_type,
        claims: dto.claims.into_iter().map(claim_from_dto).collect(),
    }
}

fn claim_from_dto(dto: ClaimDto) -> Claim {
    Claim {
        name: dto.name,
        path: dto.path,
        values: dto
            .allowed_values
            .iter()
            .map(|value| ClaimValue(value.to_string()))
            .collect(),
    }
}

/// TIL view of a stored issuer.
pub fn issuer_to_dto(issuer: &TrustedIssuer) -> TrustedIssuerDto {
    TrustedIssuerDto {
        did: Some(issuer.did.clone()),
        credentials: issuer.capabilities.iter().map(capability_to_dto).collect(),
    }
}

pub fn capability_to_dto(capability: &Capability) -> CredentialsDto {
    let valid_for = match (&capability.valid_from, &capability.valid_to) {
        (None, None) => None,
        (from, to) => Some(TimeRangeDto {
            from: from.clone(),
            to: to.clone(),
        }),
    };
    CredentialsDto {
        valid_for,
        credentials_type: capability.credentials_type.clone(),
        claims: capability.claims.iter().map(claim_to_dto).collect(),
    }
}

fn claim_to_dto(claim: &Claim) -> ClaimDto {
    ClaimDto {
        name: claim.name.clone(),
        path: claim.path.clone(),
        allowed_values: claim.values.iter().filter_map(read_claim_value).collect(),
    }
}

/// Stored values are JSON text; anything unreadable is dropped.
fn read_claim_value(value: &ClaimValue) -> Option<Value> {
    match serde_json::from_str(&value.0) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(value = %value.0, error = %e, "Skipping unreadable claim value");
            None
        }
    }
}

/// TIR view of a stored issuer: one hashed attribute per capability.
pub fn issuer_to_registry_dto(issuer: &TrustedIssuer) -> IssuerDto {
    IssuerDto {
        did: issuer.did.clone(),
        attributes: issuer
            .capabilities
            .iter()
            .map(|capability| attribute_from_capability(&capability_to_dto(capability)))
            .collect(),
    }
}

fn attribute_from_capability(capability: &CredentialsDto) -> IssuerAttributeDto {
    // Serializing plain strings and JSON values cannot fail.
    let body = serde_json::to_vec(capability).unwrap_or_default();
    IssuerAttributeDto {
        hash: STANDARD.encode(Sha256::digest(&body)),
        body: STANDARD.encode(&body),
        issuer_type: IssuerType::Undefined,
    }
}
