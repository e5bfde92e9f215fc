//! Process lifecycle coordination.
//!
//! # Design Decisions
//! - Ordered shutdown: stop accepting, let in-flight requests drain, stop
//!   background tasks (cache sweeper) via the broadcast signal

pub mod shutdown;

pub use shutdown::Shutdown;
