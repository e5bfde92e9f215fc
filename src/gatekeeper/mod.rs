//! Gatekeeper decision subsystem.
//!
//! # Data Flow
//! ```text
//! request path + headers
//!     → routes.rs (static asset / public / protected classification)
//!     → engine.rs (session resolution, role resolution via cache)
//!     → roles.rs (legacy token normalization, landing paths)
//!     → decision.rs (pass-through / rewrite / redirect)
//! ```
//!
//! # Design Decisions
//! - The engine is pure composition: providers, cache, and TTL are injected
//!   so it can be tested without a server or global state
//! - Every error path resolves to a decision; nothing propagates to the
//!   caller

pub mod decision;
pub mod engine;
pub mod roles;
pub mod routes;

pub use decision::{Decision, ErrorCode};
pub use engine::Gatekeeper;
pub use roles::Role;
pub use routes::RouteClass;
