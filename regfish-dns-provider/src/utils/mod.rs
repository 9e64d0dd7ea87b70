//! Utility modules.

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;

/// TTL serialization helpers (whole seconds).
pub mod ttl;
