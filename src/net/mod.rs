//! Network layer.
//!
//! # Responsibilities
//! - Bind the TCP listener the HTTP server accepts on
//! - Load certificates when TLS termination is configured

pub mod listener;
pub mod tls;

pub use listener::{bind, ListenerError};
