//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`       - Short link redirect
//! - `POST /shorten`      - Create a short link
//! - `POST /api/shorten`  - Same handler, API prefix
//!
//! `shorten` and `api` are reserved and never issued as codes, so the
//! static routes cannot shadow a link.
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` assigned when absent and echoed back
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{redirect_handler, shorten_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware except path
/// normalization.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/shorten", post(shorten_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
        .layer(tracing::propagate_request_id_layer())
        .layer(tracing::set_request_id_layer())
}

/// Constructs the application service: [`build_router`] wrapped so that
/// `/shorten/` and `/abc1234/` route like their slash-free forms.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{LinkService, LinkServiceConfig};
    use crate::domain::entities::Link;
    use crate::domain::repositories::{InsertOutcome, MockLinkStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn state_with(store: MockLinkStore) -> AppState {
        let (tx, _rx) = mpsc::channel(16);
        let service = LinkService::new(
            Arc::new(store) as Arc<dyn crate::domain::repositories::LinkStore>,
            LinkServiceConfig::default(),
            tx,
        );
        AppState::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        let mut store = MockLinkStore::new();
        store.expect_get().returning(|code| {
            Ok(Some(Link::new(
                code.to_string(),
                "https://example.com/target".to_string(),
                0,
                None,
            )))
        });

        let response = app_router(state_with(store))
            .oneshot(Request::get("/abc1234/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/target"
        );
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let mut store = MockLinkStore::new();
        store
            .expect_insert_if_absent()
            .returning(|_| Ok(InsertOutcome::Inserted));

        let response = app_router(state_with(store))
            .oneshot(
                Request::post("/api/shorten")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-request-id", "req-42")
                    .body(Body::from(r#"{"url":"https://example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let response = app_router(state_with(MockLinkStore::new()))
            .oneshot(Request::get("/no").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
