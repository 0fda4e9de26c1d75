use shortstack::application::services::{LinkService, LinkServiceConfig, ShortenCommand};
use shortstack::domain::repositories::LinkStore;
use shortstack::error::AppError;
use shortstack::infrastructure::persistence::MemoryLinkStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

fn service(store: Arc<MemoryLinkStore>) -> Arc<LinkService<dyn LinkStore>> {
    let (tx, _rx) = mpsc::channel(1000);
    let store: Arc<dyn LinkStore> = store;
    Arc::new(LinkService::new(store, LinkServiceConfig::default(), tx))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_alias_has_one_winner() {
    let store = Arc::new(MemoryLinkStore::new());
    let service = service(store.clone());

    let mut handles = Vec::new();
    for i in 0..2 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .allocate(ShortenCommand {
                    url: format!("https://example.com/{}", i),
                    alias: Some("dupe".to_string()),
                    ttl_hours: None,
                })
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                assert_eq!(link.code, "dupe");
                created += 1;
            }
            Err(AppError::AliasConflict) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_aliases_one_winner() {
    let store = Arc::new(MemoryLinkStore::new());
    let service = service(store.clone());

    let mut handles = Vec::new();
    for i in 0..32 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .allocate(ShortenCommand {
                    url: format!("https://example.com/{}", i),
                    alias: Some("contested".to_string()),
                    ttl_hours: None,
                })
                .await
                .map(|link| link.long_url)
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        if let Ok(url) = handle.await.unwrap() {
            winners.push(url);
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = store.get("contested").await.unwrap().unwrap();
    assert_eq!(stored.long_url, winners[0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_unique() {
    let store = Arc::new(MemoryLinkStore::new());
    let service = service(store.clone());

    let mut handles = Vec::new();
    for i in 0..200 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .allocate(ShortenCommand {
                    url: format!("https://example.com/{}", i),
                    ..ShortenCommand::default()
                })
                .await
                .unwrap()
                .code
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let code = handle.await.unwrap();
        assert_eq!(code.len(), 7);
        assert!(codes.insert(code));
    }

    assert_eq!(store.len().await, 200);
}
