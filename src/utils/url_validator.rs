//! Input validation for shorten requests.
//!
//! Covers the target URL, the optional alias and the optional `ttlHours`.
//!
//! # Private Hosts
//!
//! [`is_private_host`] is a textual pattern check on the host string, not IP
//! range arithmetic. It catches the common literal forms (`localhost`,
//! `127.x`, `10.x`, `192.168.x`, `172.16-31.x`, `*.local`) but not IPv6
//! loopback or unique-local addresses, nor DNS names that resolve to private
//! addresses.

use regex::Regex;
use std::sync::LazyLock;
use url::{ParseError, Url};

/// Maximum accepted length of a long URL, in characters.
pub const MAX_URL_LEN: usize = 2048;

/// Smallest accepted `ttlHours`.
pub const MIN_TTL_HOURS: i64 = 1;

/// Largest accepted `ttlHours` (one year).
pub const MAX_TTL_HOURS: i64 = 24 * 365;

static PRIVATE_HOST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^localhost$",
        r"^127\.",
        r"^10\.",
        r"^192\.168\.",
        r"^172\.(1[6-9]|2\d|3[0-1])\.",
        r"\.local$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("private host pattern is valid"))
    .collect()
});

/// Reasons a shorten request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL is empty or too long")]
    EmptyOrTooLong,

    #[error("URL contains whitespace")]
    Whitespace,

    #[error("Only http/https URLs are allowed")]
    UnsupportedScheme,

    #[error("URL must include a hostname")]
    MissingHost,

    #[error("Invalid URL format")]
    Malformed,

    #[error("Private/local URLs are not allowed")]
    PrivateHost,

    #[error("ttlHours must be an integer")]
    TtlNotInteger,

    #[error("ttlHours must be between 1 and 8760")]
    TtlOutOfRange,
}

/// Validates a long URL.
///
/// # Rules
///
/// 1. Non-empty and at most [`MAX_URL_LEN`] characters
/// 2. No whitespace anywhere
/// 3. Scheme is `http` or `https`
/// 4. Has a host
/// 5. When `block_private_hosts` is set, the host is not private
///    (see [`is_private_host`])
///
/// The first failing rule decides the error.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com", true).is_ok());
/// assert_eq!(validate_url("ftp://example.com", true), Err(ValidationError::UnsupportedScheme));
/// assert_eq!(validate_url("http://localhost:8080", true), Err(ValidationError::PrivateHost));
/// ```
pub fn validate_url(input: &str, block_private_hosts: bool) -> Result<(), ValidationError> {
    if input.is_empty() || input.chars().count() > MAX_URL_LEN {
        return Err(ValidationError::EmptyOrTooLong);
    }

    if input.chars().any(char::is_whitespace) {
        return Err(ValidationError::Whitespace);
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return Err(ValidationError::UnsupportedScheme);
        }
        Err(ParseError::EmptyHost) => {
            return Err(if has_web_scheme(input) {
                ValidationError::MissingHost
            } else {
                ValidationError::UnsupportedScheme
            });
        }
        Err(_) if !has_web_scheme(input) => return Err(ValidationError::UnsupportedScheme),
        Err(_) => return Err(ValidationError::Malformed),
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme);
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(ValidationError::MissingHost),
    };

    if block_private_hosts && is_private_host(host) {
        return Err(ValidationError::PrivateHost);
    }

    Ok(())
}

/// Returns true if `host` looks like a loopback, private-range or mDNS host.
///
/// Matching is case-insensitive and purely textual.
pub fn is_private_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    PRIVATE_HOST_PATTERNS.iter().any(|p| p.is_match(&host))
}

/// Reads an optional `ttlHours` value from a JSON body.
///
/// Accepts JSON integers and strings holding an integer; `null` means absent.
/// The range is checked separately by [`check_ttl_range`].
///
/// # Errors
///
/// Returns [`ValidationError::TtlNotInteger`] for anything that is not an
/// integer.
pub fn parse_ttl_hours(value: Option<&serde_json::Value>) -> Result<Option<i64>, ValidationError> {
    let hours = match value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.as_i64().ok_or(ValidationError::TtlNotInteger)?,
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::TtlNotInteger)?,
        Some(_) => return Err(ValidationError::TtlNotInteger),
    };

    Ok(Some(hours))
}

/// Checks that `hours` lies in [`MIN_TTL_HOURS`]..=[`MAX_TTL_HOURS`].
pub fn check_ttl_range(hours: i64) -> Result<i64, ValidationError> {
    if (MIN_TTL_HOURS..=MAX_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ValidationError::TtlOutOfRange)
    }
}

fn has_web_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
