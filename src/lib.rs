//! Session/role gatekeeper for the coaching platform.
//!
//! Sits in front of the application backend and decides, for every inbound
//! request, whether to forward it upstream, rewrite it, or redirect it to
//! the login page.
//!
//! # Request Flow
//!
//! ```text
//! Client Request
//!     → http/server.rs   (Axum setup, timeouts, request IDs)
//!     → gatekeeper/      (session + role resolution, route classification)
//!         → providers/   (external session & role lookups)
//!         → cache/       (60s in-process role cache)
//!     → decision: pass-through | rewrite | redirect
//!     → forward to upstream backend (pass-through, audit headers injected)
//! ```
//!
//! The decision engine never fails a request: every provider error resolves
//! to either an anonymous fallback or a login redirect.

// Core subsystems
pub mod config;
pub mod gatekeeper;
pub mod http;
pub mod providers;

// Shared state
pub mod audit;
pub mod cache;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use cache::InMemoryRoleCache;
pub use config::GatekeeperConfig;
pub use gatekeeper::Gatekeeper;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
