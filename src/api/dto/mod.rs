//! Data Transfer Objects for API requests and responses.
//!
//! Field names follow the public JSON contract (`ttlHours`, `shortUrl`),
//! not Rust naming.

pub mod shorten;
