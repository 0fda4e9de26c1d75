//! Application layer services implementing the allocation and redirect
//! protocol.
//!
//! Services consume the domain's storage trait and provide a small API for
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - allocate, resolve and record-hit

pub mod services;
