//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use trusted_issuers_registry::registry::MemoryIssuerStore;
use trusted_issuers_registry::{HttpServer, RegistryConfig, Shutdown};

/// A registry running on an ephemeral local port.
pub struct TestRegistry {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl TestRegistry {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestRegistry {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a registry with the given configuration.
pub async fn start_registry(config: RegistryConfig) -> TestRegistry {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(MemoryIssuerStore::new(None)));
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestRegistry {
        addr,
        shutdown,
        client: reqwest::Client::new(),
    }
}

/// A TIL payload with one capability.
pub fn issuer_payload(did: &str) -> Value {
    json!({
        "did": did,
        "credentials": [{
            "validFor": {"from": "2017-07-21T17:32:28Z", "to": "2030-07-21T17:32:28Z"},
            "credentialsType": "CustomerCredential",
            "claims": [{"name": "roles", "allowedValues": ["GOLD_CUSTOMER", "STANDARD_CUSTOMER"]}]
        }]
    })
}

/// Register `count` issuers named `did:web:issuer000`, `did:web:issuer001`, ...
#[allow(dead_code)]
pub async fn seed_issuers(registry: &TestRegistry, count: usize) -> Vec<String> {
    let mut dids = Vec::with_capacity(count);
    for i in 0..count {
        let did = format!("did:web:issuer{:03}", i);
        let res = registry
            .client
            .post(registry.url("/issuer"))
            .json(&issuer_payload(&did))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
        dids.push(did);
    }
    dids
}
