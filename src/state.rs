//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkStore;

/// State cloned into every request.
///
/// The store behind the service is chosen at startup, so it is held as a
/// trait object.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkStore>>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService<dyn LinkStore>>) -> Self {
        Self { link_service }
    }
}
