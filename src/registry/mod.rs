//! Trusted issuer records.
//!
//! # Data Flow
//! ```text
//! TIL payload (dto.rs)
//!     → mapper.rs (claim values to JSON text)
//!     → model.rs (stored form)
//!     → store.rs (IssuerStore, in-memory + JSON snapshot)
//!
//! Reads go the other way; the TIR view additionally hashes and base64
//! encodes every capability.
//! ```

pub mod dto;
pub mod mapper;
pub mod model;
pub mod store;

pub use model::{is_did, TrustedIssuer};
pub use store::{IssuerStore, MemoryIssuerStore, StoreError};
