//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use club_gatekeeper::config::GatekeeperConfig;
use club_gatekeeper::providers::{RoleError, RoleProvider, Session, SessionError, SessionProvider};
use club_gatekeeper::{Gatekeeper, HttpServer, InMemoryRoleCache, Shutdown};

/// Session provider double returning a fixed outcome, counting calls.
pub struct FixedSessions {
    session: Option<Session>,
    calls: AtomicUsize,
}

impl FixedSessions {
    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            session: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn user(user_id: &str) -> Arc<Self> {
        Arc::new(Self {
            session: Some(Session {
                user_id: user_id.to_string(),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for FixedSessions {
    async fn get_session(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.clone())
    }
}

/// Role provider double returning a fixed raw token.
pub struct FixedRoles {
    role: Option<String>,
}

impl FixedRoles {
    pub fn returning(role: &str) -> Arc<Self> {
        Arc::new(Self {
            role: Some(role.to_string()),
        })
    }

    pub fn missing() -> Arc<Self> {
        Arc::new(Self { role: None })
    }
}

#[async_trait]
impl RoleProvider for FixedRoles {
    async fn fetch_role(&self, _user_id: &str) -> Result<Option<String>, RoleError> {
        Ok(self.role.clone())
    }
}

/// Start a mock upstream backend that echoes the request path and the
/// audit headers it received.
pub async fn start_mock_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) => break,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                let body = format!(
                    "path={};ip={};ua={}",
                    path,
                    header_value(&head, "x-client-ip"),
                    header_value(&head, "x-user-agent"),
                );
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn header_value(head: &str, name: &str) -> String {
    head.lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Start a gatekeeper server on an ephemeral port in front of `upstream`.
pub async fn spawn_gatekeeper(
    sessions: Arc<dyn SessionProvider>,
    roles: Arc<dyn RoleProvider>,
    upstream: SocketAddr,
) -> SocketAddr {
    let mut config = GatekeeperConfig::default();
    config.upstream.address = upstream.to_string();
    config.observability.metrics_enabled = false;

    let gatekeeper = Arc::new(Gatekeeper::new(
        sessions,
        roles,
        Arc::new(InMemoryRoleCache::new()),
        Duration::from_secs(60),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, gatekeeper).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, Shutdown::new()).await;
    });

    addr
}

/// Client that surfaces redirects instead of following them.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
