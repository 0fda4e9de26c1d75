//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to the public JSON contract.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request-id and tracing middleware
//! - [`routes`] - Routes nested under `/api`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
