//! Issuer storage.
//!
//! The API only talks to [`IssuerStore`]. The bundled implementation keeps
//! records in a concurrent map and can snapshot them to a JSON file.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::observability::metrics;
use crate::registry::model::TrustedIssuer;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Issuer already exists: {0}")]
    AlreadyExists(String),

    #[error("Issuer not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage seam for issuer records.
///
/// Implementations must be thread-safe. Listing has no snapshot semantics.
pub trait IssuerStore: Send + Sync + Debug {
    fn get(&self, did: &str) -> Option<TrustedIssuer>;

    fn exists(&self, did: &str) -> bool;

    /// Add a new issuer, failing if the DID is already registered.
    fn insert(&self, issuer: TrustedIssuer) -> Result<(), StoreError>;

    /// Replace an existing issuer, failing if the DID is unknown.
    fn replace(&self, issuer: TrustedIssuer) -> Result<(), StoreError>;

    fn remove(&self, did: &str) -> Option<TrustedIssuer>;

    /// All registered DIDs, ascending.
    fn dids(&self) -> Vec<String>;

    fn count(&self) -> usize;
}

/// In-memory issuer store with optional JSON snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryIssuerStore {
    inner: Arc<DashMap<String, TrustedIssuer>>,
    persistence_path: Option<String>,
}

impl MemoryIssuerStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<String>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists, otherwise start empty.
    pub fn load_from_file(path: &str) -> Result<Self, StoreError> {
        let store = Self::new(Some(path.to_string()));
        if Path::new(path).exists() {
            let reader = BufReader::new(File::open(path)?);
            let issuers: Vec<TrustedIssuer> = serde_json::from_reader(reader)?;
            for issuer in issuers {
                store.inner.insert(issuer.did.clone(), issuer);
            }
            tracing::info!(path = %path, issuers = store.inner.len(), "Loaded issuer snapshot");
        }
        metrics::record_registry_size(store.inner.len());
        Ok(store)
    }

    /// Write all issuers to the snapshot file, ordered by DID.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.persistence_path {
            let ordered: BTreeMap<String, TrustedIssuer> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();
            let issuers: Vec<&TrustedIssuer> = ordered.values().collect();

            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &issuers)?;
            tracing::info!(path = %path, issuers = issuers.len(), "Saved issuer snapshot");
        }
        Ok(())
    }
}

impl IssuerStore for MemoryIssuerStore {
    fn get(&self, did: &str) -> Option<TrustedIssuer> {
        self.inner.get(did).map(|r| r.value().clone())
    }

    fn exists(&self, did: &str) -> bool {
        self.inner.contains_key(did)
    }

    fn insert(&self, issuer: TrustedIssuer) -> Result<(), StoreError> {
        let did = issuer.did.clone();
        // The entry guard must be released before len() takes the shard locks.
        let inserted = match self.inner.entry(did.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(issuer);
                true
            }
        };
        if !inserted {
            return Err(StoreError::AlreadyExists(did));
        }
        metrics::record_registry_size(self.inner.len());
        Ok(())
    }

    fn replace(&self, issuer: TrustedIssuer) -> Result<(), StoreError> {
        match self.inner.get_mut(&issuer.did) {
            Some(mut existing) => {
                *existing = issuer;
                Ok(())
            }
            None => Err(StoreError::NotFound(issuer.did)),
        }
    }

    fn remove(&self, did: &str) -> Option<TrustedIssuer> {
        let removed = self.inner.remove(did).map(|(_, issuer)| issuer);
        if removed.is_some() {
            metrics::record_registry_size(self.inner.len());
        }
        removed
    }

    fn dids(&self) -> Vec<String> {
        let mut dids: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        dids.sort_unstable();
        dids
    }

    fn count(&self) -> usize {
        self.inner.len()
    }
}
