//! Forwarding header parsing.
//!
//! # Responsibilities
//! - Read the configurable legacy `X-Forwarded-*` headers
//! - Read the RFC 7239 `Forwarded` header (first value only)
//! - Resolve the port to a concrete number
//!
//! # Design Decisions
//! - `Forwarded` wins over legacy headers for the same field
//! - Malformed input never fails the request; it falls back to defaults
//! - Multiple hops in one `Forwarded` element list are not supported,
//!   only the first element of each directive is read

use axum::http::header::FORWARDED;
use axum::http::{HeaderMap, HeaderName};

use crate::config::{ForwardHeadersConfig, RegistryConfig};
use crate::forwarding::info::{ForwardedInfo, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};

/// Port as known while parsing, before it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    /// Use the protocol's default port.
    Default,
    /// Use the port the connection was accepted on.
    FromTransport,
    Explicit(u16),
}

impl PortSpec {
    /// Interpret a numeric port as sent by proxies: `0` asks for the
    /// protocol default, `-1` for the transport port.
    pub fn from_number(value: i64) -> Option<Self> {
        match value {
            0 => Some(PortSpec::Default),
            -1 => Some(PortSpec::FromTransport),
            1..=65535 => Some(PortSpec::Explicit(value as u16)),
            _ => None,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().and_then(Self::from_number)
    }

    /// Resolve to a concrete port for `proto`.
    pub fn resolve(self, proto: &str, transport_port: u16) -> u16 {
        match self {
            PortSpec::Explicit(port) => port,
            PortSpec::FromTransport => transport_port,
            PortSpec::Default if proto.eq_ignore_ascii_case("https") => DEFAULT_HTTPS_PORT,
            PortSpec::Default => DEFAULT_HTTP_PORT,
        }
    }
}

/// What the service reports about itself when no proxy header says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDefaults {
    pub protocol: String,
    pub host: String,
    pub port: PortSpec,
}

impl ServerDefaults {
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            protocol: config.default_protocol().to_string(),
            host: config.server.host.clone(),
            port: config
                .server
                .port
                .map(PortSpec::Explicit)
                .unwrap_or(PortSpec::FromTransport),
        }
    }
}

/// Legacy header names that survived configuration.
#[derive(Debug, Clone, Default)]
struct LegacyHeaders {
    forwarded_for: Option<HeaderName>,
    proto: Option<HeaderName>,
    host: Option<HeaderName>,
    port: Option<HeaderName>,
    prefix: Option<HeaderName>,
}

impl LegacyHeaders {
    fn from_config(config: &ForwardHeadersConfig) -> Self {
        Self {
            forwarded_for: header_name(config.for_header.as_deref()),
            proto: header_name(config.protocol_header.as_deref()),
            host: header_name(config.host_header.as_deref()),
            port: header_name(config.port_header.as_deref()),
            prefix: header_name(config.prefix_header.as_deref()),
        }
    }
}

fn header_name(name: Option<&str>) -> Option<HeaderName> {
    let name = name.filter(|n| !n.is_empty())?;
    match HeaderName::from_bytes(name.as_bytes()) {
        Ok(header) => Some(header),
        Err(_) => {
            tracing::warn!(header = %name, "Ignoring invalid forwarding header name");
            None
        }
    }
}

/// Mutable parse state. Only lives inside [`ForwardHeaderParser::parse`].
struct Draft {
    forwarded_for: Option<String>,
    proto: String,
    host: String,
    port: PortSpec,
    by: Option<String>,
    prefix: String,
}

/// Resolves [`ForwardedInfo`] from request headers.
///
/// Built once from configuration and shared by every request.
#[derive(Debug, Clone)]
pub struct ForwardHeaderParser {
    legacy: LegacyHeaders,
    defaults: ServerDefaults,
}

impl ForwardHeaderParser {
    pub fn new(headers: &ForwardHeadersConfig, defaults: ServerDefaults) -> Self {
        Self {
            legacy: LegacyHeaders::from_config(headers),
            defaults,
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(&config.forward_headers, ServerDefaults::from_config(config))
    }

    pub fn defaults(&self) -> &ServerDefaults {
        &self.defaults
    }

    /// Parse the forwarding headers of one request.
    ///
    /// `transport_port` is the local port the connection arrived on.
    pub fn parse(&self, headers: &HeaderMap, transport_port: u16) -> ForwardedInfo {
        let mut draft = Draft {
            forwarded_for: None,
            proto: self.defaults.protocol.clone(),
            host: self.defaults.host.clone(),
            port: self.defaults.port,
            by: None,
            prefix: String::new(),
        };

        self.apply_legacy(headers, &mut draft);
        apply_forwarded(headers, &mut draft);

        let port = draft.port.resolve(&draft.proto, transport_port);
        ForwardedInfo {
            forwarded_for: draft.forwarded_for,
            forwarded_proto: draft.proto,
            forwarded_host: draft.host,
            forwarded_port: port,
            forwarded_by: draft.by,
            forwarded_prefix: draft.prefix,
        }
    }

    fn apply_legacy(&self, headers: &HeaderMap, draft: &mut Draft) {
        if let Some(value) = header_value(headers, self.legacy.forwarded_for.as_ref()) {
            draft.forwarded_for = Some(value.to_string());
        }
        if let Some(value) = header_value(headers, self.legacy.proto.as_ref()) {
            draft.proto = value.to_string();
        }
        if let Some(value) = header_value(headers, self.legacy.host.as_ref()) {
            draft.host = value.to_string();
        }
        if let Some(value) = header_value(headers, self.legacy.port.as_ref()) {
            match PortSpec::parse(value) {
                Some(port) => draft.port = port,
                None if value.trim().is_empty() => {}
                None => tracing::debug!(port = %value, "Ignoring unparsable forwarded port"),
            }
        }
        if let Some(value) = header_value(headers, self.legacy.prefix.as_ref()) {
            draft.prefix = value.to_string();
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: Option<&HeaderName>) -> Option<&'a str> {
    headers.get(name?).and_then(|v| v.to_str().ok())
}

fn apply_forwarded(headers: &HeaderMap, draft: &mut Draft) {
    let Some(forwarded) = headers.get(FORWARDED).and_then(|v| v.to_str().ok()) else {
        return;
    };
    if forwarded.is_empty() {
        return;
    }

    for directive in forwarded.split(';') {
        let first = directive.trim().split(',').next().unwrap_or_default();
        let Some((key, value)) = first.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());

        match key.trim().to_ascii_lowercase().as_str() {
            "for" => draft.forwarded_for = Some(value.to_string()),
            "proto" => draft.proto = value.to_string(),
            "host" => {
                let (host, port) = split_host(value);
                draft.host = host.to_string();
                draft.port = port
                    .and_then(PortSpec::parse)
                    .unwrap_or(PortSpec::Default);
            }
            "by" => draft.by = Some(value.to_string()),
            _ => {}
        }
    }
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Split `host[:port]`, keeping bracketed IPv6 literals intact.
fn split_host(value: &str) -> (&str, Option<&str>) {
    if value.starts_with('[') {
        if let Some(end) = value.find(']') {
            let (host, rest) = value.split_at(end + 1);
            return (host, rest.strip_prefix(':'));
        }
    }
    match value.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (value, None),
    }
}
