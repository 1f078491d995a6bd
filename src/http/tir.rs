//! Trusted issuers registry (TIR v4) handlers.
//!
//! # Responsibilities
//! - Anchor-paginated listing of registered DIDs
//! - Per-issuer view with hashed, base64 encoded attributes
//!
//! # Design Decisions
//! - A page request is validated in the order: anchor format, anchor
//!   existence, page size. The first failure wins.
//! - `total` is the registry size on every page, including empty ones
//! - Item and navigation links are relative to the service root; `self`
//!   is absolute and built from the forwarded request URL

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::forwarding::RequestUrl;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::pagination::{paginate, Page, PageRequest, PageSize, PaginationError};
use crate::registry::dto::{IssuerDto, IssuerEntry, IssuersResponse, Links};
use crate::registry::is_did;
use crate::registry::mapper::issuer_to_registry_dto;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuersQuery {
    /// Kept as text so malformed values get a problem-details response.
    pub page_size: Option<String>,
    pub last_issuer: Option<String>,
}

impl ListIssuersQuery {
    fn page_request(self, state: &AppState) -> Result<PageRequest, ApiError> {
        if let Some(anchor) = &self.last_issuer {
            if !is_did(anchor) {
                metrics::record_page_rejected("invalid_anchor");
                return Err(PaginationError::InvalidAnchor(anchor.clone()).into());
            }
            if !state.store.exists(anchor) {
                metrics::record_page_rejected("anchor_not_found");
                return Err(PaginationError::AnchorNotFound(anchor.clone()).into());
            }
        }

        let page_size = match self.page_size.as_deref() {
            None => PageSize::default(),
            Some(raw) => PageSize::parse(raw).inspect_err(|_| {
                metrics::record_page_rejected("invalid_page_size");
            })?,
        };

        Ok(PageRequest {
            anchor: self.last_issuer,
            page_size,
        })
    }
}

/// `GET /v4/issuers`
pub async fn list_issuers(
    State(state): State<AppState>,
    url: RequestUrl,
    Query(query): Query<ListIssuersQuery>,
) -> Result<Json<IssuersResponse>, ApiError> {
    let request = query.page_request(&state)?;
    let collection = state.collection_path();

    // The anchor can disappear between the existence check and the scan.
    let page = paginate(state.store.dids(), &request, &collection).inspect_err(|_| {
        metrics::record_page_rejected("anchor_not_found");
    })?;

    tracing::debug!(
        returned = page.returned,
        total = page.total,
        last_issuer = ?page.prev_anchor,
        "Issuer page served"
    );

    Ok(Json(listing_response(page, &collection, url.join(&format!("{collection}/")))))
}

fn listing_response(page: Page, collection: &str, self_link: String) -> IssuersResponse {
    let href = |did: &str| format!("{collection}/{did}");
    let links = Links {
        first: page.items.first().map(|entry| entry.href.clone()),
        prev: page.prev_anchor.as_deref().map(href),
        next: page.next_anchor.as_deref().map(href),
    };

    IssuersResponse {
        page_size: page.returned,
        total: page.total,
        self_link,
        links,
        items: page
            .items
            .into_iter()
            .map(|entry| IssuerEntry {
                did: entry.identifier,
                href: entry.href,
            })
            .collect(),
    }
}

/// `GET /v4/issuers/{did}`
pub async fn get_issuer(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> Result<Json<IssuerDto>, ApiError> {
    if !is_did(&did) {
        return Err(ApiError::BadRequest("Provided string is not a valid did.".into()));
    }
    state
        .store
        .get(&did)
        .map(|issuer| Json(issuer_to_registry_dto(&issuer)))
        .ok_or_else(|| ApiError::NotFound(format!("Issuer {did} not found.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageEntry;

    fn entry(did: &str) -> PageEntry {
        PageEntry {
            identifier: did.into(),
            href: format!("/v4/issuers/{did}"),
        }
    }

    #[test]
    fn test_listing_links() {
        let page = Page {
            items: vec![entry("did:web:b"), entry("did:web:c")],
            total: 5,
            returned: 2,
            next_anchor: Some("did:web:d".into()),
            prev_anchor: Some("did:web:a".into()),
        };
        let response = listing_response(page, "/v4/issuers", "http://localhost/v4/issuers/".into());

        assert_eq!(response.page_size, 2);
        assert_eq!(response.total, 5);
        assert_eq!(response.items[1].did, "did:web:c");
        assert_eq!(response.links.first.as_deref(), Some("/v4/issuers/did:web:b"));
        assert_eq!(response.links.prev.as_deref(), Some("/v4/issuers/did:web:a"));
        assert_eq!(response.links.next.as_deref(), Some("/v4/issuers/did:web:d"));
    }

    #[test]
    fn test_empty_page_keeps_total() {
        let page = Page {
            items: vec![],
            total: 3,
            returned: 0,
            next_anchor: None,
            prev_anchor: Some("did:web:c".into()),
        };
        let response = listing_response(page, "/v4/issuers", "http://localhost/v4/issuers/".into());

        assert!(response.items.is_empty());
        assert_eq!(response.page_size, 0);
        assert_eq!(response.total, 3);
        assert_eq!(response.links.first, None);
        assert_eq!(response.links.next, None);
    }
}
