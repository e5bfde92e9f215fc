//! Audit context extraction.
//!
//! # Responsibilities
//! - Derive a best-effort client IP and user agent from request headers
//! - Provide the header names under which they travel downstream
//!
//! # Design Decisions
//! - IP source priority: CDN header, then reverse-proxy header, then the
//!   first forwarded-for entry; loopback when nothing is present
//! - Extraction is best-effort for audit trails only, never used for
//!   authorization

use axum::http::HeaderMap;

/// Header injected into forwarded requests with the client IP.
pub const CLIENT_IP_HEADER: &str = "x-client-ip";

/// Header injected into forwarded requests with the user agent.
pub const USER_AGENT_HEADER: &str = "x-user-agent";

const FALLBACK_IP: &str = "127.0.0.1";
const UNKNOWN_USER_AGENT: &str = "Unknown";

/// Client identity attached to pass-through requests for downstream
/// audit logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub ip_address: String,
    pub user_agent: String,
}

impl AuditContext {
    /// Extract audit context from the inbound header set.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip_address = header_str(headers, "cf-connecting-ip")
            .or_else(|| header_str(headers, "x-real-ip"))
            .or_else(|| forwarded_for_first(headers))
            .unwrap_or(FALLBACK_IP)
            .to_string();

        let user_agent = header_str(headers, "user-agent")
            .unwrap_or(UNKNOWN_USER_AGENT)
            .to_string();

        Self {
            ip_address,
            user_agent,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// First entry of a comma-separated forwarded-for list.
fn forwarded_for_first(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}
