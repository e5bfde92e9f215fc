//! Audit context propagation.

pub mod context;

pub use context::{AuditContext, CLIENT_IP_HEADER, USER_AGENT_HEADER};
