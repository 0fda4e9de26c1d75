//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{InsertOutcome, LinkStore, StoreError};

/// SQLSTATE codes worth retrying: serialization failure, deadlock,
/// too many connections, admin shutdown, cannot connect now.
const TRANSIENT_SQLSTATES: &[&str] = &["40001", "40P01", "53300", "57P01", "57P03"];

/// PostgreSQL store over the `links` table.
///
/// - Conditional insert is `INSERT … ON CONFLICT (code) DO NOTHING`; zero
///   affected rows means the code was taken
/// - Hit increments are a single `UPDATE … SET hits = hits + 1`, serialized
///   by the row lock
///
/// Expired rows are left in place. The partial index on `expires_at` is there
/// for an external reaper.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

#[derive(Debug, FromRow)]
struct LinkRow {
    code: String,
    long_url: String,
    created_at: i64,
    expires_at: Option<i64>,
    hits: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Self {
            code: row.code,
            long_url: row.long_url,
            created_at: row.created_at,
            expires_at: row.expires_at,
            hits: row.hits,
        }
    }
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let transient = match &e {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
            sqlx::Error::Database(db) => db
                .code()
                .is_some_and(|code| TRANSIENT_SQLSTATES.contains(&code.as_ref())),
            _ => false,
        };

        if transient {
            StoreError::Transient(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn insert_if_absent(&self, link: &Link) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, long_url, created_at, expires_at, hits)
            VALUES ($1, $2, $3, $4, 0)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(&link.code)
        .bind(&link.long_url)
        .bind(link.created_at)
        .bind(link.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, long_url, created_at, expires_at, hits
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_hits(&self, code: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE links SET hits = COALESCE(hits, 0) + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_transient() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_transient());
    }

    #[test]
    fn test_row_not_found_is_not_transient() {
        assert!(!StoreError::from(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn test_io_error_is_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(StoreError::from(sqlx::Error::Io(io)).is_transient());
    }

    #[test]
    fn test_row_conversion() {
        let link = Link::from(LinkRow {
            code: "abcd123".to_string(),
            long_url: "https://example.com".to_string(),
            created_at: 10,
            expires_at: Some(20),
            hits: 3,
        });

        assert_eq!(link.code, "abcd123");
        assert_eq!(link.expires_at, Some(20));
        assert_eq!(link.hits, 3);
    }
}
