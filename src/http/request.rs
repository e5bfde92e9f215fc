//! Request identity.
//!
//! # Design Decisions
//! - Request IDs are UUID v4, assigned as early as possible so every log
//!   line and the forwarded upstream request share one correlation ID

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns a UUID v4 request ID to each inbound request.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuid4;

impl MakeRequestId for MakeRequestUuid4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
