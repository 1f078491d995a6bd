//! TCP listener setup.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("Invalid bind address '{0}'")]
    Address(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the registry listener.
///
/// Port 0 picks a free port; the actual one is logged and available
/// through `local_addr`.
pub async fn bind(bind_address: &str) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| ListenerError::Address(bind_address.to_string()))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listener bound");
    }
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        assert!(matches!(
            bind("not-an-address").await,
            Err(ListenerError::Address(_))
        ));
    }
}
