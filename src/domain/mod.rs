//! Domain layer containing the link entity, the storage contract and hit
//! counting.
//!
//! # Architecture
//!
//! - [`entities`] - The persisted [`entities::Link`] record
//! - [`repositories`] - The [`repositories::LinkStore`] contract implemented by
//!   the infrastructure layer
//! - [`hit_event`] - Hit event passed from resolves to the worker
//! - [`hit_worker`] - Background worker applying hit increments
//!
//! # Hit Counting Flow
//!
//! 1. A resolve succeeds in [`crate::application::services::LinkService`]
//! 2. A [`hit_event::HitEvent`] is pushed onto a bounded channel (dropped if full)
//! 3. [`hit_worker::run_hit_worker`] applies it with
//!    [`repositories::LinkStore::increment_hits`]

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
