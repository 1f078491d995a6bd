//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the TIL, TIR and health handlers
//! - Wire up middleware (forwarding filter, request ID, tracing, timeout, metrics)
//! - Serve plain HTTP or TLS on an already bound listener
//! - Stop accepting and drain on the shutdown broadcast
//!
//! # Middleware order (outermost first)
//! ```text
//! forwarding filter → set request ID → trace span → propagate request ID
//!     → timeout → metrics → handler
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RegistryConfig;
use crate::forwarding::{forwarded_for_middleware, ForwardHeaderParser, ForwardingState};
use crate::http::request::UuidRequestId;
use crate::http::{health, til, tir};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::observability::tracing::make_request_span;
use crate::registry::IssuerStore;

/// Drain period granted to in-flight TLS connections on shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn IssuerStore>,
    /// Route prefix of the API, empty or starting with `/`.
    pub base_path: String,
}

impl AppState {
    /// Relative path of the TIR issuer collection.
    pub fn collection_path(&self) -> String {
        format!("{}/v4/issuers", self.base_path)
    }

    /// Relative path of one issuer.
    pub fn issuer_path(&self, did: &str) -> String {
        format!("{}/v4/issuers/{}", self.base_path, did)
    }
}

/// HTTP server for the issuer registry.
pub struct HttpServer {
    config: RegistryConfig,
    state: AppState,
    parser: ForwardHeaderParser,
}

impl HttpServer {
    pub fn new(config: RegistryConfig, store: Arc<dyn IssuerStore>) -> Self {
        let state = AppState {
            store,
            base_path: config.api.base_path.trim_end_matches('/').to_string(),
        };
        let parser = ForwardHeaderParser::from_config(&config);
        Self {
            config,
            state,
            parser,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `transport_port` is the local port requests arrive on. It is used
    /// when neither configuration nor proxy headers pin the port.
    #[allow(deprecated)]
    pub fn router(&self, transport_port: u16) -> Router {
        let api = Router::new()
            .route("/issuer", post(til::create_issuer))
            .route(
                "/issuer/{did}",
                get(til::get_issuer)
                    .put(til::replace_issuer)
                    .delete(til::delete_issuer),
            )
            .route("/v4/issuers", get(tir::list_issuers))
            .route("/v4/issuers/{did}", get(tir::get_issuer));

        let routes = if self.state.base_path.is_empty() {
            api
        } else {
            Router::new().nest(&self.state.base_path, api)
        };

        let forwarding = ForwardingState::new(self.parser.clone(), transport_port);

        routes
            .route("/health", get(health::health))
            .with_state(self.state.clone())
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(middleware::from_fn_with_state(forwarding, forwarded_for_middleware))
    }

    /// Run the server on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let app = self.router(addr.port());

        match &self.config.server.tls {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                    })
                    .await?;
            }
            Some(tls) => {
                let rustls = load_tls_config(&tls.cert_path, &tls.key_path).await?;
                let handle = axum_server::Handle::new();

                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
                });

                tracing::info!(address = %addr, "HTTPS server starting");
                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record request count and latency once the handler has answered.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryIssuerStore;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn server(base_path: &str) -> HttpServer {
        let mut config = RegistryConfig::default();
        config.api.base_path = base_path.to_string();
        HttpServer::new(config, Arc::new(MemoryIssuerStore::new(None)))
    }

    fn post_issuer(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_location_uses_forwarded_origin() {
        let app = server("").router(8080);
        let mut request = post_issuer("/issuer", r#"{"did":"did:web:a","credentials":[]}"#);
        request.headers_mut().insert(
            "forwarded",
            "for=192.0.2.60;proto=https;host=registry.example.org".parse().unwrap(),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://registry.example.org/v4/issuers/did:web:a"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_base_path() {
        let app = server("/registry").router(8080);

        let response = app
            .clone()
            .oneshot(post_issuer("/registry/issuer", r#"{"did":"did:web:a"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://localhost:8080/registry/v4/issuers/did:web:a"
        );

        let response = app
            .clone()
            .oneshot(Request::get("/issuer/did:web:a").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_kept() {
        let app = server("").router(8080);
        let request = Request::get("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }
}
