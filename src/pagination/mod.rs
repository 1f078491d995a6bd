//! Anchor-based pagination over a sorted identifier universe.
//!
//! The issuer store only offers a full, sortable enumeration. A page is
//! found by scanning that enumeration up to the anchor (the last identifier
//! the client has seen) and collecting what follows, which makes every call
//! O(n) in the size of the registry.
//!
//! There is no snapshot between calls: issuers added or removed between two
//! page requests can be skipped or seen twice.

use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Reasons a page request is rejected before any scanning happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("The requested page size {0} is not supported, it must be between 1 and 100.")]
    InvalidPageSize(i64),

    #[error("The requested page size '{0}' is not a number.")]
    MalformedPageSize(String),

    #[error("lastIssuer '{0}' is not a valid did.")]
    InvalidAnchor(String),

    #[error("The given page does not exist: {0}")]
    AnchorNotFound(String),
}

/// Number of entries per page, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageSize(usize);

impl PageSize {
    pub fn new(size: i64) -> Result<Self, PaginationError> {
        if (1..=MAX_PAGE_SIZE as i64).contains(&size) {
            Ok(Self(size as usize))
        } else {
            Err(PaginationError::InvalidPageSize(size))
        }
    }

    /// Parse a page size from its query string form.
    pub fn parse(raw: &str) -> Result<Self, PaginationError> {
        let size = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| PaginationError::MalformedPageSize(raw.to_string()))?;
        Self::new(size)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

/// A validated page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Last identifier seen by the client. Exclusive.
    pub anchor: Option<String>,
    pub page_size: PageSize,
}

/// One identifier on a page, with its resource link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub identifier: String,
    pub href: String,
}

/// The result of one pagination call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<PageEntry>,
    /// Size of the whole universe, also for empty pages.
    pub total: usize,
    pub returned: usize,
    /// First identifier of the following page, if any.
    pub next_anchor: Option<String>,
    /// The anchor this page was requested with.
    pub prev_anchor: Option<String>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifier to pass as anchor to get the following page.
    pub fn resume_anchor(&self) -> Option<&str> {
        self.next_anchor
            .as_ref()
            .and(self.items.last())
            .map(|entry| entry.identifier.as_str())
    }
}

/// Cut one page out of `universe`.
///
/// The universe is sorted ascending (duplicates collapsed) before the scan.
/// Entry links are `<link_base>/<identifier>`.
pub fn paginate<I, S>(universe: I, request: &PageRequest, link_base: &str) -> Result<Page, PaginationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ids: Vec<String> = universe.into_iter().map(Into::into).collect();
    ids.sort_unstable();
    ids.dedup();

    let start = match request.anchor.as_deref() {
        None => 0,
        Some(anchor) => match ids.iter().position(|id| id == anchor) {
            Some(index) => index + 1,
            None => return Err(PaginationError::AnchorNotFound(anchor.to_string())),
        },
    };

    let total = ids.len();
    let mut remaining = ids.into_iter().skip(start);
    let items: Vec<PageEntry> = remaining
        .by_ref()
        .take(request.page_size.get())
        .map(|identifier| PageEntry {
            href: format!("{}/{}", link_base.trim_end_matches('/'), identifier),
            identifier,
        })
        .collect();
    let next_anchor = remaining.next();

    Ok(Page {
        returned: items.len(),
        items,
        total,
        next_anchor,
        prev_anchor: request.anchor.clone(),
    })
}
