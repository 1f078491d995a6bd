//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the registry.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the trusted issuers registry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Listener and advertised server identity.
    pub server: ServerConfig,

    /// Names of the legacy `X-Forwarded-*` headers.
    pub forward_headers: ForwardHeadersConfig,

    /// Route layout.
    pub api: ApiConfig,

    /// Issuer store settings.
    pub storage: StorageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RegistryConfig {
    /// Protocol the service speaks itself, used when no proxy says otherwise.
    pub fn default_protocol(&self) -> &'static str {
        if self.server.tls.is_some() {
            "https"
        } else {
            "http"
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Host name the service advertises when no proxy header overrides it.
    pub host: String,

    /// Advertised port. When unset, the port the listener bound is used.
    pub port: Option<u16>,

    /// Optional TLS configuration. Switches the default protocol to https.
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            host: "localhost".to_string(),
            port: None,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Legacy forwarding header names.
///
/// A missing or empty name disables that lookup entirely; there is no
/// hardcoded fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardHeadersConfig {
    /// Header carrying the client address.
    pub for_header: Option<String>,

    /// Header carrying the original protocol.
    pub protocol_header: Option<String>,

    /// Header carrying the original host.
    pub host_header: Option<String>,

    /// Header carrying the original port.
    pub port_header: Option<String>,

    /// Header carrying the path prefix added by the proxy.
    pub prefix_header: Option<String>,
}

impl ForwardHeadersConfig {
    /// Configuration with every legacy lookup switched off.
    pub fn disabled() -> Self {
        Self {
            for_header: None,
            protocol_header: None,
            host_header: None,
            port_header: None,
            prefix_header: None,
        }
    }

    /// All configured names, labelled for error reporting.
    pub fn named(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("for_header", self.for_header.as_deref()),
            ("protocol_header", self.protocol_header.as_deref()),
            ("host_header", self.host_header.as_deref()),
            ("port_header", self.port_header.as_deref()),
            ("prefix_header", self.prefix_header.as_deref()),
        ]
    }
}

impl Default for ForwardHeadersConfig {
    fn default() -> Self {
        Self {
            for_header: Some("X-Forwarded-For".to_string()),
            protocol_header: Some("X-Forwarded-Proto".to_string()),
            host_header: Some("X-Forwarded-Host".to_string()),
            port_header: Some("X-Forwarded-Port".to_string()),
            prefix_header: Some("X-Forwarded-Prefix".to_string()),
        }
    }
}

/// Route layout.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for every route, e.g. "/registry". Empty means root.
    pub base_path: String,
}

/// Issuer store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot loaded at startup and written on shutdown.
    pub persistence_path: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config: RegistryConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, None);
        assert_eq!(
            config.forward_headers.prefix_header.as_deref(),
            Some("X-Forwarded-Prefix")
        );
        assert_eq!(config.default_protocol(), "http");
    }

    #[test]
    fn test_tls_switches_default_protocol() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [server]
            host = "registry.example.org"
            port = 8443

            [server.tls]
            cert_path = "cert.pem"
            key_path = "key.pem"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_protocol(), "https");
        assert_eq!(config.server.port, Some(8443));
    }

    #[test]
    fn test_header_names_can_be_overridden() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [forward_headers]
            host_header = "X-Original-Host"
            prefix_header = ""
            "#,
        )
        .unwrap();
        assert_eq!(
            config.forward_headers.host_header.as_deref(),
            Some("X-Original-Host")
        );
        assert_eq!(config.forward_headers.prefix_header.as_deref(), Some(""));
        // untouched names keep their defaults
        assert_eq!(
            config.forward_headers.for_header.as_deref(),
            Some("X-Forwarded-For")
        );
    }
}
