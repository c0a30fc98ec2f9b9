//! Structured logging for the chat widget.
//!
//! Console output plus an optional rolling NDJSON file, redaction of secrets
//! in logged chat text, and typed conversation events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ChatEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, LogSettings};
pub use redact::redact_sensitive_data;
