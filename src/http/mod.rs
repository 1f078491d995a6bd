//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → forwarding filter (client-facing origin, see crate::forwarding)
//!     → request.rs (request ID)
//!     → til.rs / tir.rs / health.rs (handlers)
//!     → error.rs (problem-details on failure)
//! ```

pub mod error;
pub mod health;
pub mod request;
pub mod server;
pub mod til;
pub mod tir;

pub use error::{ApiError, ProblemDetails};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
