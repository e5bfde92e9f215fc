//! Gatekeeper decision engine.
//!
//! # Responsibilities
//! - Resolve the caller's session once per request, degrading safely
//! - Resolve the caller's role through the cache, then the provider
//! - Apply the route table: landing redirects, area restrictions,
//!   redirected-from tracking for anonymous callers
//!
//! # Failure Semantics
//! - Expired refresh token: anonymous, silent
//! - Any other session failure: anonymous, debug-level log
//! - Role lookup failure or missing profile: `/login?error=profilo`
//! - Wrong role for a restricted area: `/login?error=accesso_negato`
//! - Unexpected internal failure: error log, `/login?error=errore_server`
//!
//! Nothing escapes this engine; every path ends in a decision.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use tracing::{debug, error};

use crate::audit::AuditContext;
use crate::cache::RoleCache;
use crate::gatekeeper::decision::{Decision, ErrorCode};
use crate::gatekeeper::roles::Role;
use crate::gatekeeper::routes::{self, RouteClass};
use crate::observability::metrics;
use crate::providers::{RoleProvider, Session, SessionProvider};

/// Why the authenticated branch could not produce a normal decision.
#[derive(Debug)]
enum AuthFailure {
    /// Authenticated session with no resolvable role.
    Profile,
    /// Unexpected internal failure (e.g. cache backend).
    Internal(String),
}

/// Per-request gatekeeping over injected collaborators.
pub struct Gatekeeper {
    sessions: Arc<dyn SessionProvider>,
    roles: Arc<dyn RoleProvider>,
    cache: Arc<dyn RoleCache>,
    cache_ttl: Duration,
}

impl Gatekeeper {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        roles: Arc<dyn RoleProvider>,
        cache: Arc<dyn RoleCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            roles,
            cache,
            cache_ttl,
        }
    }

    /// Decide what to do with an inbound request.
    ///
    /// Infallible by construction: every internal error resolves to a
    /// redirect or an anonymous fallback.
    pub async fn decide(&self, path: &str, headers: &HeaderMap) -> Decision {
        // Icon probes browsers issue on their own; must precede the static
        // suffix check or the rewrite would be unreachable.
        if let Some(fallback) = routes::icon_fallback(path) {
            return Decision::Rewrite {
                path: fallback.to_string(),
            };
        }

        // Static assets skip everything, including audit capture.
        if routes::is_static_asset(path) {
            return Decision::pass();
        }

        // API routes are authenticated by the backend itself.
        if routes::matches_prefix(path, routes::API_PREFIX) {
            return Decision::pass();
        }

        if path == routes::LEGACY_LOGIN_PATH {
            return Decision::redirect(routes::LOGIN_PATH);
        }

        let session = self.get_session_safely(headers).await;

        let decision = if routes::is_public_file(path) {
            Decision::pass()
        } else {
            match session {
                Some(session) => self.authenticated(path, &session).await,
                None => Self::unauthenticated(path),
            }
        };

        metrics::record_decision(decision.kind());

        // Every final pass-through carries audit context downstream.
        match decision {
            Decision::PassThrough { .. } => {
                Decision::pass_with_audit(AuditContext::from_headers(headers))
            }
            other => other,
        }
    }

    /// Resolve the session, degrading every failure to anonymous.
    async fn get_session_safely(&self, headers: &HeaderMap) -> Option<Session> {
        match self.sessions.get_session(headers).await {
            Ok(session) => session,
            Err(err) => {
                // An expired refresh token is how every session ends; only
                // other failures are worth a diagnostic line.
                if !err.is_refresh_token_error() {
                    debug!(error = %err, "session retrieval failed, treating as anonymous");
                    metrics::record_session_failure();
                }
                None
            }
        }
    }

    async fn authenticated(&self, path: &str, session: &Session) -> Decision {
        match self.authenticated_inner(path, session).await {
            Ok(decision) => decision,
            Err(AuthFailure::Profile) => Decision::login_with_error(ErrorCode::Profile),
            Err(AuthFailure::Internal(reason)) => {
                error!(path, reason = %reason, "unexpected failure in authenticated branch");
                Decision::login_with_error(ErrorCode::ServerError)
            }
        }
    }

    async fn authenticated_inner(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<Decision, AuthFailure> {
        let role = self.resolve_role(session).await?;

        if path == routes::LOGIN_PATH {
            if let Some(landing) = role.landing_path() {
                return Ok(Decision::redirect(landing));
            }
            // Roles without a landing page fall through to the area checks.
        }

        // Root is never a landing page, even when authenticated.
        if path == "/" {
            return Ok(Decision::redirect(routes::LOGIN_PATH));
        }

        if routes::is_public_route(path) {
            return Ok(Decision::pass());
        }

        match routes::classify(path) {
            RouteClass::TrainerArea if !role.can_access_dashboard() => {
                debug!(path, role = %role, "dashboard area denied");
                Ok(Decision::login_with_error(ErrorCode::AccessDenied))
            }
            RouteClass::AthleteArea if !role.can_access_home() => {
                debug!(path, role = %role, "home area denied");
                Ok(Decision::login_with_error(ErrorCode::AccessDenied))
            }
            _ => Ok(Decision::pass()),
        }
    }

    /// Role from the cache, or the provider on a miss.
    async fn resolve_role(&self, session: &Session) -> Result<Role, AuthFailure> {
        match self.cache.get(&session.user_id) {
            Ok(Some(raw)) => {
                metrics::record_cache_hit();
                return Ok(Role::normalize(&raw));
            }
            Ok(None) => {}
            Err(err) => return Err(AuthFailure::Internal(err.to_string())),
        }

        metrics::record_cache_miss();
        let raw = match self.roles.fetch_role(&session.user_id).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(user_id = %session.user_id, "authenticated user has no profile role");
                return Err(AuthFailure::Profile);
            }
            Err(err) => {
                debug!(user_id = %session.user_id, error = %err, "role lookup failed");
                return Err(AuthFailure::Profile);
            }
        };

        self.cache
            .set(&session.user_id, &raw, self.cache_ttl)
            .map_err(|err| AuthFailure::Internal(err.to_string()))?;

        Ok(Role::normalize(&raw))
    }

    fn unauthenticated(path: &str) -> Decision {
        if path == "/" {
            return Decision::redirect(routes::LOGIN_PATH);
        }
        if routes::is_public_route(path) {
            return Decision::pass();
        }
        if routes::protected_prefix(path).is_some() {
            return Decision::login_redirected_from(path);
        }
        // Unrecognized paths defer to downstream routing.
        Decision::pass()
    }
}
