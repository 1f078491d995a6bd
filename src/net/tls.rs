//! TLS certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load a rustls configuration from PEM encoded certificate and key files.
pub async fn load_tls_config(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
) -> Result<RustlsConfig, std::io::Error> {
    let (cert_path, key_path) = (cert_path.as_ref(), key_path.as_ref());
    for (kind, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{kind} file not found: {}", path.display()),
            ));
        }
    }

    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::info!(cert = %cert_path.display(), "TLS certificate loaded");
    Ok(config)
}
