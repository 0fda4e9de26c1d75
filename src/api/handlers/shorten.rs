//! Handler for the link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::ShortenCommand;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorten` (also mounted at `POST /api/shorten`)
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "alias": "promo",   // optional
///   "ttlHours": 24      // optional, 1-8760
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "code": "promo", "shortUrl": "https://go.example.com/promo" }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, bad URL or bad `ttlHours`
/// - 409 if the alias is taken
/// - 500 if no code could be allocated or storage failed
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let command = ShortenCommand {
        url: payload.url.trim().to_string(),
        alias: payload.alias,
        ttl_hours: payload.ttl_hours,
    };

    let link = state.link_service.allocate(command).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: link.code,
            short_url,
        }),
    ))
}
