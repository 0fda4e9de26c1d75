//! Link store backends.
//!
//! Concrete implementations of [`crate::domain::repositories::LinkStore`].
//!
//! # Backends
//!
//! - [`MemoryLinkStore`] - In-process map, single instance only
//! - [`PgLinkStore`] - PostgreSQL via SQLx, schema in `migrations/`
//! - [`RedisLinkStore`] - Redis hashes written by Lua scripts
//!
//! [`RetryingStore`] wraps any of them to retry transient failures.

pub mod memory_link_store;
pub mod pg_link_store;
pub mod redis_link_store;
pub mod retrying_store;

pub use memory_link_store::MemoryLinkStore;
pub use pg_link_store::PgLinkStore;
pub use redis_link_store::RedisLinkStore;
pub use retrying_store::RetryingStore;
