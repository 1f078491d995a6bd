//! Request provenance subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → filter.rs (outermost middleware, once per request)
//!     → parser.rs (legacy X-Forwarded-* pass, then RFC 7239 Forwarded pass)
//!     → info.rs (ForwardedInfo + canonical RequestUrl in request extensions)
//!     → tracing span, handlers building Location / self links
//! ```
//!
//! # Design Decisions
//! - Header names for the legacy pass are configuration, not constants
//! - Port sentinels from proxies are modelled as `PortSpec` and resolved
//!   before `ForwardedInfo` is produced
//! - Nothing here can fail a request

pub mod filter;
pub mod info;
pub mod parser;

pub use filter::{forwarded_for_middleware, ForwardingState};
pub use info::{ForwardedInfo, RequestUrl};
pub use parser::{ForwardHeaderParser, PortSpec, ServerDefaults};
