//! Short link allocation and resolution.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::domain::entities::Link;
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::{InsertOutcome, LinkStore};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved, is_valid_code, normalize_alias};
use crate::utils::url_validator::{check_ttl_range, parse_ttl_hours, validate_url};

/// Maximum number of random candidates tried before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Settings the service needs, taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct LinkServiceConfig {
    /// Length of generated codes.
    pub code_len: usize,
    /// Reject loopback/private/`.local` targets.
    pub block_private_hosts: bool,
    /// Prefix for short URLs, without trailing slash. Empty means "bare code".
    pub public_base_url: String,
}

impl Default for LinkServiceConfig {
    fn default() -> Self {
        Self {
            code_len: crate::utils::code_generator::DEFAULT_CODE_LEN,
            block_private_hosts: true,
            public_base_url: String::new(),
        }
    }
}

/// Input of [`LinkService::allocate`].
#[derive(Debug, Clone, Default)]
pub struct ShortenCommand {
    pub url: String,
    pub alias: Option<String>,
    /// Raw `ttlHours` as received. Must be an integer in 1..=8760; it is
    /// only looked at once the URL has passed validation.
    pub ttl_hours: Option<serde_json::Value>,
}

/// Coordinates validation, code generation and the store.
///
/// # Allocation
///
/// - A usable alias (see [`normalize_alias`]) gets exactly one conditional
///   insert; a taken alias is [`AppError::AliasConflict`]
/// - Otherwise up to [`MAX_ALLOCATION_ATTEMPTS`] random candidates are tried;
///   only [`InsertOutcome::AlreadyExists`] moves on to the next candidate,
///   any store error ends allocation immediately
///
/// Uniqueness comes from the store's conditional insert alone, so it holds
/// across any number of service instances.
///
/// # Resolution
///
/// Malformed codes are rejected without a store round trip. Expiry is checked
/// here on every resolve because backend expiry is only best effort. The hit
/// increment is queued for the background worker and never delays or fails
/// the redirect.
pub struct LinkService<S: LinkStore + ?Sized> {
    store: Arc<S>,
    generator: CodeGenerator,
    config: LinkServiceConfig,
    hit_sender: mpsc::Sender<HitEvent>,
}

impl<S: LinkStore + ?Sized> LinkService<S> {
    /// Creates a new link service.
    pub fn new(store: Arc<S>, config: LinkServiceConfig, hit_sender: mpsc::Sender<HitEvent>) -> Self {
        Self {
            store,
            generator: CodeGenerator::new(config.code_len),
            config,
            hit_sender,
        }
    }

    /// Validates the command and stores a new link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad URL or `ttl_hours`
    /// - [`AppError::AliasConflict`] if the alias is taken
    /// - [`AppError::AllocationExhausted`] if every random candidate collided
    /// - [`AppError::Store`] on storage failure
    pub async fn allocate(&self, command: ShortenCommand) -> Result<Link, AppError> {
        validate_url(&command.url, self.config.block_private_hosts)?;
        let ttl_hours = parse_ttl_hours(command.ttl_hours.as_ref())?
            .map(check_ttl_range)
            .transpose()?;

        let now = Utc::now().timestamp();
        let expires_at = ttl_hours.map(|h| now + h * 3600);

        let alias = command.alias.as_deref().map(normalize_alias).unwrap_or_default();

        if !alias.is_empty() {
            return self.allocate_alias(alias, command.url, now, expires_at).await;
        }

        self.allocate_generated(command.url, now, expires_at).await
    }

    /// Looks up a code and returns its link if it may be followed.
    ///
    /// Queues a hit on success.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for malformed or unknown codes
    /// - [`AppError::Expired`] when the link is past its expiry
    /// - [`AppError::Store`] on storage failure
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        if !is_valid_code(code) {
            metrics::counter!("link_resolves_total", "outcome" => "not_found").increment(1);
            return Err(AppError::NotFound);
        }

        let Some(link) = self.store.get(code).await? else {
            metrics::counter!("link_resolves_total", "outcome" => "not_found").increment(1);
            return Err(AppError::NotFound);
        };

        if link.is_expired_at(Utc::now().timestamp()) {
            metrics::counter!("link_resolves_total", "outcome" => "expired").increment(1);
            debug!(code, expires_at = ?link.expires_at, "Resolve of expired link");
            return Err(AppError::Expired);
        }

        self.record_hit(code);
        metrics::counter!("link_resolves_total", "outcome" => "redirect").increment(1);

        Ok(link)
    }

    /// Queues a hit for `code` without waiting.
    ///
    /// The event is dropped if the queue is full or the worker is gone.
    pub fn record_hit(&self, code: &str) {
        match self.hit_sender.try_send(HitEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("link_hits_dropped_total").increment(1);
                warn!(code = %event.code, "Hit queue full, dropping hit");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("link_hits_dropped_total").increment(1);
                warn!(code = %event.code, "Hit worker not running, dropping hit");
            }
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        if self.config.public_base_url.is_empty() {
            code.to_string()
        } else {
            format!("{}/{}", self.config.public_base_url, code)
        }
    }

    async fn allocate_alias(
        &self,
        alias: String,
        long_url: String,
        now: i64,
        expires_at: Option<i64>,
    ) -> Result<Link, AppError> {
        let link = Link::new(alias, long_url, now, expires_at);

        match self.store.insert_if_absent(&link).await? {
            InsertOutcome::Inserted => {
                metrics::counter!("links_created_total", "source" => "alias").increment(1);
                info!(code = %link.code, "Link created from alias");
                Ok(link)
            }
            InsertOutcome::AlreadyExists => {
                metrics::counter!("link_alias_conflicts_total").increment(1);
                debug!(code = %link.code, "Alias already taken");
                Err(AppError::AliasConflict)
            }
        }
    }

    async fn allocate_generated(
        &self,
        long_url: String,
        now: i64,
        expires_at: Option<i64>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.generator.next_candidate();
            if is_reserved(&code) {
                metrics::counter!("link_code_collisions_total").increment(1);
                continue;
            }

            let link = Link::new(code, long_url.clone(), now, expires_at);

            match self.store.insert_if_absent(&link).await? {
                InsertOutcome::Inserted => {
                    metrics::counter!("links_created_total", "source" => "generated").increment(1);
                    info!(code = %link.code, attempt, "Link created");
                    return Ok(link);
                }
                InsertOutcome::AlreadyExists => {
                    metrics::counter!("link_code_collisions_total").increment(1);
                    debug!(code = %link.code, attempt, "Generated code collided");
                }
            }
        }

        metrics::counter!("link_allocation_exhausted_total").increment(1);
        error!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            code_len = self.generator.length(),
            "Could not allocate a unique code"
        );

        Err(AppError::AllocationExhausted)
    }
}
