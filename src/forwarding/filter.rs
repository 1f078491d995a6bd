//! Forwarding filter middleware.
//!
//! Runs as the outermost layer so every later stage (tracing, handlers,
//! Location generation) sees the client-facing origin instead of the
//! internal listener address.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::forwarding::parser::ForwardHeaderParser;

/// State shared by every invocation of the filter.
#[derive(Debug, Clone)]
pub struct ForwardingState {
    pub parser: Arc<ForwardHeaderParser>,
    /// Local port the listener accepted connections on.
    pub transport_port: u16,
}

impl ForwardingState {
    pub fn new(parser: ForwardHeaderParser, transport_port: u16) -> Self {
        Self {
            parser: Arc::new(parser),
            transport_port,
        }
    }
}

/// Resolve forwarding headers once and attach the result to the request.
pub async fn forwarded_for_middleware(
    State(state): State<ForwardingState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let info = state.parser.parse(request.headers(), state.transport_port);
    let url = info.request_url();

    tracing::trace!(
        forwarded_for = ?info.forwarded_for,
        forwarded_by = ?info.forwarded_by,
        request_url = %url,
        "Resolved request origin"
    );

    let extensions = request.extensions_mut();
    extensions.insert(info);
    extensions.insert(url);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForwardHeadersConfig;
    use crate::forwarding::info::{ForwardedInfo, RequestUrl};
    use crate::forwarding::parser::{PortSpec, ServerDefaults};
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn echo(info: ForwardedInfo, url: RequestUrl) -> String {
        format!("{}|{}", url, info.forwarded_for.unwrap_or_default())
    }

    fn app(port: PortSpec) -> Router {
        let parser = ForwardHeaderParser::new(
            &ForwardHeadersConfig::default(),
            ServerDefaults {
                protocol: "http".into(),
                host: "myhost".into(),
                port,
            },
        );
        let state = ForwardingState::new(parser, 7000);
        Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn_with_state(state, forwarded_for_middleware))
    }

    async fn call(app: Router, headers: &[(&str, &str)]) -> String {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_attaches_info_and_url() {
        let body = call(
            app(PortSpec::Explicit(8080)),
            &[("Forwarded", "for=10.0.0.1;proto=https;host=example.com")],
        )
        .await;
        assert_eq!(body, "https://example.com|10.0.0.1");
    }

    #[tokio::test]
    async fn test_prefix_and_port_in_url() {
        let body = call(
            app(PortSpec::Explicit(8080)),
            &[
                ("X-Forwarded-Host", "myserver"),
                ("X-Forwarded-Port", "9000"),
                ("X-Forwarded-Prefix", "/v1"),
            ],
        )
        .await;
        assert_eq!(body, "http://myserver:9000/v1|");
    }

    #[tokio::test]
    async fn test_no_headers_uses_server_identity() {
        let body = call(app(PortSpec::Explicit(8080)), &[]).await;
        assert_eq!(body, "http://myhost:8080|");
    }

    #[tokio::test]
    async fn test_transport_port_fallback() {
        let body = call(app(PortSpec::FromTransport), &[]).await;
        assert_eq!(body, "http://myhost:7000|");

        let body = call(app(PortSpec::Explicit(8080)), &[("X-Forwarded-Port", "-1")]).await;
        assert_eq!(body, "http://myhost:7000|");
    }

    #[tokio::test]
    async fn test_malformed_headers_do_not_fail_request() {
        let body = call(
            app(PortSpec::Explicit(8080)),
            &[("Forwarded", "host=example.com:nope;;="), ("X-Forwarded-Port", "abc")],
        )
        .await;
        assert_eq!(body, "http://example.com|");
    }

    #[tokio::test]
    async fn test_extractor_rejects_without_filter() {
        let app = Router::new().route("/", get(echo));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
