//! Session retrieval.

use async_trait::async_trait;
use axum::http::HeaderMap;
use thiserror::Error;

/// An authenticated caller, as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable user identifier.
    pub user_id: String,
}

/// Failure retrieving the current session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Structured error reported by the provider itself.
    #[error("session provider error: {message}")]
    Provider {
        code: Option<String>,
        message: String,
    },
    /// Network or protocol failure reaching the provider.
    #[error("session transport error: {0}")]
    Transport(String),
}

impl SessionError {
    /// True for the expected terminal state of an expired session.
    ///
    /// An invalid or missing refresh token is how every session ends; it is
    /// not a fault and must not be logged as one.
    pub fn is_refresh_token_error(&self) -> bool {
        match self {
            SessionError::Provider { code, message } => {
                code.as_deref() == Some("refresh_token_not_found")
                    || message.contains("Invalid Refresh Token")
                    || message.contains("Refresh Token Not Found")
            }
            SessionError::Transport(_) => false,
        }
    }
}

/// Retrieves the session for the current request, if any.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve the caller's session from the inbound header set.
    ///
    /// `Ok(None)` means an anonymous request; errors are classified by the
    /// caller via [`SessionError::is_refresh_token_error`].
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_shapes_are_benign() {
        let by_code = SessionError::Provider {
            code: Some("refresh_token_not_found".to_string()),
            message: "token expired".to_string(),
        };
        assert!(by_code.is_refresh_token_error());

        let by_message = SessionError::Provider {
            code: None,
            message: "AuthApiError: Refresh Token Not Found".to_string(),
        };
        assert!(by_message.is_refresh_token_error());

        let by_invalid = SessionError::Provider {
            code: None,
            message: "Invalid Refresh Token: Already Used".to_string(),
        };
        assert!(by_invalid.is_refresh_token_error());
    }

    #[test]
    fn test_other_errors_are_not_benign() {
        let provider = SessionError::Provider {
            code: Some("internal".to_string()),
            message: "unexpected".to_string(),
        };
        assert!(!provider.is_refresh_token_error());

        let transport = SessionError::Transport("connection refused".to_string());
        assert!(!transport.is_refresh_token_error());
    }
}
