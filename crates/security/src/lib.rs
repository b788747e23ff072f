//! Security primitives for the journal core: input validation and
//! sanitization, a bounded in-memory security event log, a sliding-window
//! rate limiter, and a content-security-policy builder.
//!
//! The event log and rate limiter are cheap-clone handles constructed once
//! and passed to whatever needs them; clones share state.

extern crate tracing as log;

pub mod csp;
pub mod event_log;
pub mod rate_limit;
pub mod sanitize;
pub mod validate;

pub use csp::generate_csp;
pub use event_log::{LogEntry, SecurityLog, Severity};
pub use rate_limit::RateLimitTable;
pub use sanitize::sanitize_text;
pub use validate::{validate_email, validate_password, validate_text_length};
