//! Runs against a live PostgreSQL: `DATABASE_URL=... cargo test -- --ignored`.

use sqlx::PgPool;
use std::sync::Arc;
use shortstack::domain::entities::Link;
use shortstack::domain::repositories::{InsertOutcome, LinkStore};
use shortstack::infrastructure::persistence::PgLinkStore;

fn link(code: &str, url: &str) -> Link {
    Link::new(code.to_string(), url.to_string(), 1_700_000_000, None)
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_if_absent(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));

    let first = store
        .insert_if_absent(&link("pgcode1", "https://a.com"))
        .await
        .unwrap();
    assert_eq!(first, InsertOutcome::Inserted);

    let second = store
        .insert_if_absent(&link("pgcode1", "https://b.com"))
        .await
        .unwrap();
    assert_eq!(second, InsertOutcome::AlreadyExists);

    let stored = store.get("pgcode1").await.unwrap().unwrap();
    assert_eq!(stored.long_url, "https://a.com");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_get_roundtrip_with_expiry(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));
    let original = Link::new(
        "pgexp01".to_string(),
        "https://example.com".to_string(),
        1_700_000_000,
        Some(1_700_003_600),
    );

    store.insert_if_absent(&original).await.unwrap();

    let stored = store.get("pgexp01").await.unwrap().unwrap();
    assert_eq!(stored, original);
    assert!(store.get("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_hits(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));
    store
        .insert_if_absent(&link("pghits1", "https://example.com"))
        .await
        .unwrap();

    for _ in 0..3 {
        store.increment_hits("pghits1").await.unwrap();
    }
    store.increment_hits("nothere").await.unwrap();

    assert_eq!(store.get("pghits1").await.unwrap().unwrap().hits, 3);
    assert!(store.get("nothere").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    let store = PgLinkStore::new(Arc::new(pool));
    assert!(store.health_check().await);
}
