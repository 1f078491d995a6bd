//! Trusted issuers list (TIL) handlers.
//!
//! Full CRUD over issuer records. Payloads carry complete capability
//! details; the DID in the path is authoritative for updates.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::forwarding::RequestUrl;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::registry::dto::TrustedIssuerDto;
use crate::registry::is_did;
use crate::registry::mapper::{issuer_from_dto, issuer_to_dto};

/// `POST /issuer`
pub async fn create_issuer(
    State(state): State<AppState>,
    url: RequestUrl,
    Json(payload): Json<TrustedIssuerDto>,
) -> Result<Response, ApiError> {
    let did = match payload.did.clone() {
        Some(did) if !did.is_empty() => did,
        _ => return Err(ApiError::BadRequest("Did not receive a valid issuer did.".into())),
    };
    if !is_did(&did) {
        return Err(ApiError::BadRequest(format!("{did} is not a valid did.")));
    }

    state.store.insert(issuer_from_dto(did.clone(), payload))?;
    tracing::info!(did = %did, "Issuer created");

    let location = url.join(&state.issuer_path(&did));
    let mut response = StatusCode::CREATED.into_response();
    match HeaderValue::from_str(&location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(_) => tracing::warn!(location = %location, "Location is not a valid header value"),
    }
    Ok(response)
}

/// `GET /issuer/{did}`
pub async fn get_issuer(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> Result<Json<TrustedIssuerDto>, ApiError> {
    state
        .store
        .get(&did)
        .map(|issuer| Json(issuer_to_dto(&issuer)))
        .ok_or_else(|| ApiError::NotFound(format!("Issuer {did} not found.")))
}

/// `PUT /issuer/{did}`
pub async fn replace_issuer(
    State(state): State<AppState>,
    Path(did): Path<String>,
    Json(payload): Json<TrustedIssuerDto>,
) -> Result<StatusCode, ApiError> {
    if !state.store.exists(&did) {
        return Err(ApiError::NotFound(format!("Issuer {did} not found.")));
    }
    if payload.did.as_deref() != Some(did.as_str()) {
        return Err(ApiError::BadRequest(
            "The did in the body does not match the did in the path.".into(),
        ));
    }

    state.store.replace(issuer_from_dto(did.clone(), payload))?;
    tracing::info!(did = %did, "Issuer replaced");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /issuer/{did}`
pub async fn delete_issuer(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.remove(&did) {
        Some(_) => {
            tracing::info!(did = %did, "Issuer deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("Issuer {did} not found."))),
    }
}
