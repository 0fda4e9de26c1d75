//! HTTP middleware for request processing.
//!
//! Provides request-id tagging and request/response tracing.

pub mod tracing;
