//! Handler for short URL redirect.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Responds `302 Found` with the stored URL in `Location`. The hit is queued
/// for the background worker before the response is built and never delays it.
///
/// # Errors
///
/// - 404 for malformed or unknown codes
/// - 410 for expired links
/// - 500 on storage failure
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    let location = location_value(&link.long_url).into_owned();

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// Returns `long_url` in a form that is valid as a `Location` header.
///
/// Printable ASCII is sent as stored. Anything else (control characters,
/// non-ASCII paths or hosts) goes through `Url` serialization, which
/// percent-encodes the path and query and punycodes the host.
fn location_value(long_url: &str) -> Cow<'_, str> {
    if long_url.bytes().all(|b| b.is_ascii_graphic()) {
        return Cow::Borrowed(long_url);
    }

    match Url::parse(long_url) {
        Ok(url) => Cow::Owned(url.into()),
        Err(_) => Cow::Borrowed(long_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_ascii_url_is_unchanged() {
        let url = "https://example.com/path?q=1#frag";
        assert!(matches!(location_value(url), Cow::Borrowed(u) if u == url));
    }

    #[test]
    fn test_control_characters_are_encoded() {
        let location = location_value("https://example.com/a\u{1}b");

        assert_eq!(location, "https://example.com/a%01b");
        assert!(HeaderValue::from_str(&location).is_ok());
    }

    #[test]
    fn test_non_ascii_is_encoded() {
        let location = location_value("https://example.com/café");

        assert_eq!(location, "https://example.com/caf%C3%A9");
        assert!(location.is_ascii());
    }
}
