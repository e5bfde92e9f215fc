//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout, request ID, trace layers)
//!     → gatekeeper middleware (decision: pass / rewrite / redirect)
//!     → forward handler (pass-through to upstream backend)
//!     → response.rs (redirect construction, URI rewriting)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid4, X_REQUEST_ID};
pub use server::HttpServer;
