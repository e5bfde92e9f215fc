//! HTTP provider implementations against a mock auth/profile service.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use club_gatekeeper::config::AuthConfig;
use club_gatekeeper::providers::{
    HttpRoleProvider, HttpSessionProvider, RoleProvider, SessionProvider,
};

async fn session_handler(headers: HeaderMap) -> impl IntoResponse {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if cookie.contains("sb=good") {
        (StatusCode::OK, Json(json!({ "user_id": "u1" }))).into_response()
    } else if cookie.contains("sb=stale") {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "refresh_token_not_found",
                "message": "Invalid Refresh Token: Already Used"
            })),
        )
            .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn role_handler(Path(user_id): Path<String>) -> impl IntoResponse {
    if user_id == "u1" {
        (StatusCode::OK, Json(json!({ "role": "atleta" }))).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Start a mock auth/profile service on an ephemeral port.
async fn start_mock_auth_service() -> SocketAddr {
    let app = Router::new()
        .route("/session", get(session_handler))
        .route("/roles/{user_id}", get(role_handler));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn auth_config(addr: SocketAddr) -> AuthConfig {
    AuthConfig {
        base_url: format!("http://{addr}/"),
        request_timeout_secs: 2,
    }
}

fn headers_with_cookie(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, value.parse().unwrap());
    headers
}

#[tokio::test]
async fn test_session_resolves_for_valid_cookie() {
    let addr = start_mock_auth_service().await;
    let provider = HttpSessionProvider::new(&auth_config(addr)).unwrap();

    let session = provider
        .get_session(&headers_with_cookie("sb=good"))
        .await
        .unwrap()
        .expect("expected a session");
    assert_eq!(session.user_id, "u1");
}

#[tokio::test]
async fn test_bare_unauthorized_is_anonymous() {
    let addr = start_mock_auth_service().await;
    let provider = HttpSessionProvider::new(&auth_config(addr)).unwrap();

    let session = provider.get_session(&HeaderMap::new()).await.unwrap();
    assert!(session.is_none());
}

#[tokio::test]
async fn test_stale_refresh_token_maps_to_benign_error() {
    let addr = start_mock_auth_service().await;
    let provider = HttpSessionProvider::new(&auth_config(addr)).unwrap();

    let error = provider
        .get_session(&headers_with_cookie("sb=stale"))
        .await
        .unwrap_err();
    assert!(error.is_refresh_token_error());
}

#[tokio::test]
async fn test_role_fetch_and_missing_profile() {
    let addr = start_mock_auth_service().await;
    let provider = HttpRoleProvider::new(&auth_config(addr)).unwrap();

    let role = provider.fetch_role("u1").await.unwrap();
    assert_eq!(role.as_deref(), Some("atleta"));

    let missing = provider.fetch_role("ghost").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Port from an immediately-dropped listener; nothing is bound there.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let provider = HttpSessionProvider::new(&auth_config(addr)).unwrap();

    let error = provider.get_session(&HeaderMap::new()).await.unwrap_err();
    assert!(!error.is_refresh_token_error());
}
