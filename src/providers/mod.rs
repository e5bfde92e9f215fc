//! External collaborators: session and role lookup providers.
//!
//! # Data Flow
//! ```text
//! request headers (cookie / authorization)
//!     → session.rs (SessionProvider → Session { user_id } or error)
//!     → role.rs (RoleProvider: user_id → raw role token)
//!     → http.rs (reqwest-backed production implementations)
//! ```
//!
//! # Design Decisions
//! - Both providers are object-safe traits so tests can substitute
//!   counting/failing doubles and the engine stays provider-agnostic
//! - Provider errors carry enough shape to distinguish the benign
//!   expired-refresh-token case from real faults

pub mod http;
pub mod role;
pub mod session;

pub use http::{HttpRoleProvider, HttpSessionProvider, ProviderInitError};
pub use role::{RoleError, RoleProvider};
pub use session::{Session, SessionError, SessionProvider};
