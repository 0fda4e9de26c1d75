//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten a single URL.
///
/// A missing `url` deserializes as empty and is rejected by validation, so
/// the client sees the same message as for `""`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,

    /// Optional custom code. Unusable aliases fall back to a random code.
    #[serde(default)]
    pub alias: Option<String>,

    /// Raw JSON value, passed through to the service. Integer checking
    /// happens in [`crate::utils::url_validator::parse_ttl_hours`] after the
    /// URL is validated, so the error message is ours rather than serde's.
    #[serde(default, rename = "ttlHours")]
    pub ttl_hours: Option<serde_json::Value>,
}

/// Successful shortening result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,

    #[serde(rename = "shortUrl")]
    pub short_url: String,
}
