//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Memory, PostgreSQL and Redis link stores plus the retry decorator

pub mod persistence;
