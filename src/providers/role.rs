//! Profile role lookup.

use async_trait::async_trait;
use thiserror::Error;

/// Failure fetching a user's role.
#[derive(Debug, Error)]
pub enum RoleError {
    /// Structured error reported by the provider.
    #[error("role provider error: {0}")]
    Provider(String),
    /// Network or protocol failure reaching the provider.
    #[error("role transport error: {0}")]
    Transport(String),
}

/// Fetches the raw role token for a user identifier.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// `Ok(None)` means the user has no profile row (or no role on it).
    async fn fetch_role(&self, user_id: &str) -> Result<Option<String>, RoleError>;
}
