//! Resolved request provenance.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Where the client-facing request came from, as reported by proxies.
///
/// One instance per request, produced by the forwarding filter and stored in
/// the request extensions. The port is always concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedInfo {
    /// Client address as reported by the proxy chain.
    pub forwarded_for: Option<String>,
    /// "http" or "https".
    pub forwarded_proto: String,
    pub forwarded_host: String,
    pub forwarded_port: u16,
    /// Identifier of the forwarding proxy.
    pub forwarded_by: Option<String>,
    /// Path prefix added by upstream proxies, empty when none.
    pub forwarded_prefix: String,
}

impl ForwardedInfo {
    /// True when the port is the implicit one for the protocol.
    pub fn is_default_port(&self) -> bool {
        is_default_port(&self.forwarded_proto, self.forwarded_port)
    }

    /// Canonical external URL: `proto://host[:port]prefix`.
    pub fn request_url(&self) -> RequestUrl {
        let mut url = format!("{}://{}", self.forwarded_proto, self.forwarded_host);
        if !self.is_default_port() {
            url.push(':');
            url.push_str(&self.forwarded_port.to_string());
        }
        url.push_str(&self.forwarded_prefix);
        RequestUrl(url)
    }
}

pub(crate) fn is_default_port(proto: &str, port: u16) -> bool {
    (proto.eq_ignore_ascii_case("http") && port == DEFAULT_HTTP_PORT)
        || (proto.eq_ignore_ascii_case("https") && port == DEFAULT_HTTPS_PORT)
}

/// The externally visible URL the client used to reach the service root.
///
/// Never ends with a trailing slash unless the proxy prefix does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl(pub String);

impl RequestUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an absolute path (starting with '/') to the canonical URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0.trim_end_matches('/'), path)
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ForwardedInfo {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<ForwardedInfo>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Forwarding filter not installed",
        ))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestUrl {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestUrl>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Forwarding filter not installed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(proto: &str, host: &str, port: u16, prefix: &str) -> ForwardedInfo {
        ForwardedInfo {
            forwarded_for: None,
            forwarded_proto: proto.into(),
            forwarded_host: host.into(),
            forwarded_port: port,
            forwarded_by: None,
            forwarded_prefix: prefix.into(),
        }
    }

    #[test]
    fn test_request_url() {
        let cases = [
            (info("https", "example.com", 443, "/api"), "https://example.com/api"),
            (info("http", "example.com", 80, ""), "http://example.com"),
            (info("http", "myserver", 9000, "/v1"), "http://myserver:9000/v1"),
            (info("https", "example.com", 80, ""), "https://example.com:80"),
            (info("http", "example.com", 443, ""), "http://example.com:443"),
            (info("HTTPS", "example.com", 443, ""), "HTTPS://example.com"),
        ];
        for (info, expected) in cases {
            assert_eq!(info.request_url().as_str(), expected);
        }
    }

    #[test]
    fn test_join() {
        let url = RequestUrl("https://example.com/api".into());
        assert_eq!(url.join("/v4/issuers/"), "https://example.com/api/v4/issuers/");

        let url = RequestUrl("https://example.com/api/".into());
        assert_eq!(url.join("/v4/issuers"), "https://example.com/api/v4/issuers");
    }
}
