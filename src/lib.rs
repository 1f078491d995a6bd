//! Trusted issuers registry library.
//!
//! Serves the trusted issuers list (TIL) for managing issuer records and
//! the EBSI-compatible trusted issuers registry (TIR v4) for reading them,
//! with links built from the client-facing origin reported by proxies.

pub mod config;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pagination;
pub mod registry;

pub use config::RegistryConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
