#![allow(dead_code)]

use axum_test::TestServer;
use shortstack::application::services::{LinkService, LinkServiceConfig};
use shortstack::domain::entities::Link;
use shortstack::domain::hit_event::HitEvent;
use shortstack::domain::hit_worker::run_hit_worker;
use shortstack::domain::repositories::LinkStore;
use shortstack::infrastructure::persistence::MemoryLinkStore;
use shortstack::routes::build_router;
use shortstack::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub fn test_config() -> LinkServiceConfig {
    LinkServiceConfig {
        public_base_url: "https://go.example.com".to_string(),
        ..LinkServiceConfig::default()
    }
}

pub fn create_test_state(
    store: Arc<MemoryLinkStore>,
    config: LinkServiceConfig,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let store: Arc<dyn LinkStore> = store;
    let link_service = Arc::new(LinkService::new(store, config, tx));

    (AppState::new(link_service), rx)
}

/// Server over a fresh memory store with the hit worker running.
pub fn create_test_server() -> (TestServer, Arc<MemoryLinkStore>) {
    create_test_server_with(test_config())
}

pub fn create_test_server_with(config: LinkServiceConfig) -> (TestServer, Arc<MemoryLinkStore>) {
    let store = Arc::new(MemoryLinkStore::new());
    let (state, rx) = create_test_state(store.clone(), config);
    tokio::spawn(run_hit_worker(rx, store.clone()));

    let server = TestServer::new(build_router(state)).unwrap();
    (server, store)
}

pub async fn create_test_link(store: &MemoryLinkStore, code: &str, url: &str) {
    let link = Link::new(
        code.to_string(),
        url.to_string(),
        chrono::Utc::now().timestamp(),
        None,
    );
    store.insert_if_absent(&link).await.unwrap();
}

pub async fn create_expired_link(store: &MemoryLinkStore, code: &str, url: &str) {
    let now = chrono::Utc::now().timestamp();
    let link = Link::new(code.to_string(), url.to_string(), now - 7200, Some(now - 3600));
    store.insert_if_absent(&link).await.unwrap();
}

/// Polls until the stored hit count reaches `expected` or a second passes.
pub async fn wait_for_hits(store: &MemoryLinkStore, code: &str, expected: i64) -> i64 {
    let mut hits = 0;
    for _ in 0..100 {
        hits = store.get(code).await.unwrap().map(|l| l.hits).unwrap_or(0);
        if hits >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    hits
}
