//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create the Axum router with the gatekeeper middleware in front
//! - Wire up timeout, concurrency limit, request ID, and trace layers
//! - Forward pass-through requests to the upstream backend
//! - Apply redirect and rewrite decisions
//!
//! # Design Decisions
//! - The gatekeeper never sees the response path; it only shapes the
//!   request before forwarding
//! - Upstream failures map to 502; the gatekeeper itself cannot fail a
//!   request

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, Scheme},
        HeaderValue, Request, StatusCode, Uri,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::audit::{CLIENT_IP_HEADER, USER_AGENT_HEADER};
use crate::config::GatekeeperConfig;
use crate::gatekeeper::{Decision, Gatekeeper};
use crate::http::request::{MakeRequestUuid4, X_REQUEST_ID};
use crate::http::response;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into the middleware and handler.
#[derive(Clone)]
pub struct AppState {
    pub gatekeeper: Arc<Gatekeeper>,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server fronting the upstream backend.
pub struct HttpServer {
    router: Router,
    config: GatekeeperConfig,
}

impl HttpServer {
    /// Create a new server with the given configuration and gatekeeper.
    pub fn new(config: GatekeeperConfig, gatekeeper: Arc<Gatekeeper>) -> Result<Self, InvalidUri> {
        let upstream = Authority::from_str(&config.upstream.address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            gatekeeper,
            client,
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatekeeperConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                gatekeeper_middleware,
            ))
            .with_state(state)
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid4))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "gatekeeper listening"
        );

        let mut rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await?;

        tracing::info!("gatekeeper stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }
}

/// Apply the gatekeeper decision before anything reaches the forwarder.
async fn gatekeeper_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let decision = state.gatekeeper.decide(&path, req.headers()).await;

    match decision {
        Decision::PassThrough { audit } => {
            if let Some(ctx) = audit {
                if let Ok(value) = HeaderValue::from_str(&ctx.ip_address) {
                    req.headers_mut().insert(CLIENT_IP_HEADER, value);
                }
                if let Ok(value) = HeaderValue::from_str(&ctx.user_agent) {
                    req.headers_mut().insert(USER_AGENT_HEADER, value);
                }
            }
            next.run(req).await
        }
        Decision::Redirect { location } => {
            tracing::debug!(path = %path, location = %location, "redirecting");
            response::redirect(&location)
        }
        Decision::Rewrite { path: new_path } => {
            match response::rewrite_uri(req.uri(), &new_path) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(error) => tracing::warn!(%error, "failed to rewrite request uri"),
            }
            next.run(req).await
        }
    }
}

/// Forward a pass-through request to the upstream backend.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (mut parts, body) = request.into_parts();
    let mut uri_parts = parts.uri.into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "failed to build upstream uri");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream URI").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::error!(request_id = %request_id, path = %path, %error, "upstream request failed");
            metrics::record_upstream_error();
            metrics::record_request(&method, 502, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
