//! Role normalization and landing paths.
//!
//! # Responsibilities
//! - Map raw role tokens from the profile store to canonical roles
//! - Resolve the post-login landing path for a role
//!
//! # Design Decisions
//! - Closed-set normalization: a token outside the known set becomes
//!   `Other` and is preserved verbatim instead of being coerced, so a new
//!   raw token shows up in tests rather than silently misrouting
//! - Two legacy aliases survive from the old profile schema: `pt` is a
//!   trainer, `atleta` is an athlete

/// Canonical caller role after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Trainer,
    Athlete,
    /// A raw token outside the known set, preserved verbatim.
    Other(String),
}

impl Role {
    /// Normalize a raw role token from the profile store.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "admin" => Role::Admin,
            "trainer" | "pt" => Role::Trainer,
            "athlete" | "atleta" => Role::Athlete,
            other => Role::Other(other.to_string()),
        }
    }

    /// Post-login landing path for this role, if it has one.
    pub fn landing_path(&self) -> Option<&'static str> {
        match self {
            Role::Admin => Some("/dashboard/admin"),
            Role::Trainer => Some("/dashboard"),
            Role::Athlete => Some("/home"),
            Role::Other(_) => None,
        }
    }

    /// Whether this role may enter the trainer/admin dashboard area.
    pub fn can_access_dashboard(&self) -> bool {
        matches!(self, Role::Admin | Role::Trainer)
    }

    /// Whether this role may enter the athlete home area.
    pub fn can_access_home(&self) -> bool {
        matches!(self, Role::Athlete)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Trainer => write!(f, "trainer"),
            Role::Athlete => write!(f, "athlete"),
            Role::Other(raw) => write!(f, "{}", raw),
        }
    }
}
