//! Helpers shared by the application and API layers.
//!
//! - [`code_generator`] - Random code generation, alias normalization, code shape checks
//! - [`url_validator`] - Long URL, private host and `ttlHours` validation

pub mod code_generator;
pub mod url_validator;
