//! Gatekeeper decisions and redirect construction.
//!
//! # Design Decisions
//! - A decision is the only thing the engine can produce; there is no error
//!   variant, so the type system enforces "never fail a request"
//! - Error categories form a closed set carried as a query parameter the
//!   login page renders for the user

use crate::audit::AuditContext;
use crate::gatekeeper::routes;

/// Error category carried to the login page as `?error=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Authenticated session with no resolvable profile role.
    Profile,
    /// Role not allowed in the requested area.
    AccessDenied,
    /// Unexpected internal failure.
    ServerError,
}

impl ErrorCode {
    /// Query parameter value, in the platform's user-facing language.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Profile => "profilo",
            ErrorCode::AccessDenied => "accesso_negato",
            ErrorCode::ServerError => "errore_server",
        }
    }
}

/// The outcome of gatekeeping a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request downstream, optionally with audit headers.
    PassThrough { audit: Option<AuditContext> },
    /// Redirect the client to `location`.
    Redirect { location: String },
    /// Swap the request path and continue downstream.
    Rewrite { path: String },
}

impl Decision {
    /// Pass-through without audit capture (static assets, API routes).
    pub fn pass() -> Self {
        Decision::PassThrough { audit: None }
    }

    /// Pass-through carrying audit context for downstream consumers.
    pub fn pass_with_audit(audit: AuditContext) -> Self {
        Decision::PassThrough { audit: Some(audit) }
    }

    /// Redirect to a fixed location.
    pub fn redirect(location: impl Into<String>) -> Self {
        Decision::Redirect {
            location: location.into(),
        }
    }

    /// Redirect to the login page with an error category.
    pub fn login_with_error(code: ErrorCode) -> Self {
        Decision::Redirect {
            location: format!("{}?error={}", routes::LOGIN_PATH, code.as_str()),
        }
    }

    /// Redirect to login, preserving the original path for post-login
    /// return navigation.
    pub fn login_redirected_from(path: &str) -> Self {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirectedFrom", path)
            .finish();
        Decision::Redirect {
            location: format!("{}?{}", routes::LOGIN_PATH, query),
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::PassThrough { .. } => "pass",
            Decision::Redirect { .. } => "redirect",
            Decision::Rewrite { .. } => "rewrite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_redirects() {
        assert_eq!(
            Decision::login_with_error(ErrorCode::Profile),
            Decision::redirect("/login?error=profilo")
        );
        assert_eq!(
            Decision::login_with_error(ErrorCode::AccessDenied),
            Decision::redirect("/login?error=accesso_negato")
        );
        assert_eq!(
            Decision::login_with_error(ErrorCode::ServerError),
            Decision::redirect("/login?error=errore_server")
        );
    }

    #[test]
    fn test_redirected_from_is_url_encoded() {
        let decision = Decision::login_redirected_from("/dashboard/clienti");
        assert_eq!(
            decision,
            Decision::redirect("/login?redirectedFrom=%2Fdashboard%2Fclienti")
        );
    }
}
