//! HTTP-backed provider implementations.
//!
//! # Responsibilities
//! - Resolve sessions against the auth service, forwarding the caller's
//!   credentials headers
//! - Fetch profile roles by user id
//!
//! # Design Decisions
//! - Explicit per-request timeout from config instead of inheriting the
//!   runtime's ambient behavior, so worst-case gatekeeper latency is bounded
//! - A 401 whose body carries the refresh-token shape maps to the benign
//!   provider error; a bare 401 is simply an anonymous request

use axum::http::{header, HeaderMap};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;
use crate::providers::role::{RoleError, RoleProvider};
use crate::providers::session::{Session, SessionError, SessionProvider};

use async_trait::async_trait;

/// Failure constructing a provider at startup.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    #[error("invalid auth base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    user_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RoleBody {
    role: Option<String>,
}

fn build_client(config: &AuthConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
}

/// Session provider backed by the auth service's session endpoint.
pub struct HttpSessionProvider {
    client: reqwest::Client,
    session_url: Url,
}

impl HttpSessionProvider {
    pub fn new(config: &AuthConfig) -> Result<Self, ProviderInitError> {
        let base = Url::parse(&config.base_url)?;
        Ok(Self {
            client: build_client(config)?,
            session_url: base.join("session")?,
        })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let mut request = self.client.get(self.session_url.clone());
        // The auth service authenticates the caller, not the gatekeeper.
        if let Some(cookie) = headers.get(header::COOKIE) {
            request = request.header(header::COOKIE, cookie.clone());
        }
        if let Some(auth) = headers.get(header::AUTHORIZATION) {
            request = request.header(header::AUTHORIZATION, auth.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body: SessionBody = response
                    .json()
                    .await
                    .map_err(|err| SessionError::Transport(err.to_string()))?;
                Ok(Some(Session {
                    user_id: body.user_id,
                }))
            }
            StatusCode::UNAUTHORIZED => {
                let body: ErrorBody = response.json().await.unwrap_or_default();
                if body.code.is_some() || !body.message.is_empty() {
                    Err(SessionError::Provider {
                        code: body.code,
                        message: body.message,
                    })
                } else {
                    Ok(None)
                }
            }
            status => Err(SessionError::Provider {
                code: None,
                message: format!("unexpected status {}", status),
            }),
        }
    }
}

/// Role provider backed by the profile service.
pub struct HttpRoleProvider {
    client: reqwest::Client,
    roles_url: Url,
}

impl HttpRoleProvider {
    pub fn new(config: &AuthConfig) -> Result<Self, ProviderInitError> {
        let base = Url::parse(&config.base_url)?;
        Ok(Self {
            client: build_client(config)?,
            roles_url: base.join("roles/")?,
        })
    }
}

#[async_trait]
impl RoleProvider for HttpRoleProvider {
    async fn fetch_role(&self, user_id: &str) -> Result<Option<String>, RoleError> {
        let url = self
            .roles_url
            .join(user_id)
            .map_err(|err| RoleError::Provider(err.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| RoleError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body: RoleBody = response
                    .json()
                    .await
                    .map_err(|err| RoleError::Transport(err.to_string()))?;
                Ok(body.role)
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(RoleError::Provider(format!("unexpected status {}", status))),
        }
    }
}
