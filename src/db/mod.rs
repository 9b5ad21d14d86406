use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{
    Row, Sqlite,
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions},
};

/// Key/value store for the few timestamp flags the tool keeps between runs.
pub struct FlagStore {
    pool: SqlitePool,
}

impl FlagStore {
    pub async fn connect(db_url: &str) -> Result<Self> {
        let in_memory = db_url.contains(":memory:");

        // Create database if it doesn't exist
        if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating flag database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        // An in-memory database lives only as long as its single connection
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        // Connect to the database
        let pool = options.connect(db_url).await?;

        // Initialize schema
        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS flags (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO flags (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT value FROM flags WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Stored as RFC 3339 text
        let value: String = row.get("value");
        let parsed = DateTime::parse_from_rfc3339(&value)
            .map_err(|e| AppError::Flag(format!("{} holds a bad timestamp: {}", key, e)))?
            .with_timezone(&Utc);
        Ok(Some(parsed))
    }

    pub async fn clear(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM flags WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub fn last_push_key(issue_key: &str) -> String {
    format!("last_estimate_push:{}", issue_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn store() -> FlagStore {
        FlagStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_flag_is_none() {
        let store = store().await;
        assert_eq!(store.get_timestamp("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_and_overwrite() {
        let store = store().await;
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap();

        store.set_timestamp("k", first).await.unwrap();
        assert_eq!(store.get_timestamp("k").await.unwrap(), Some(first));

        store.set_timestamp("k", second).await.unwrap();
        assert_eq!(store.get_timestamp("k").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = store().await;
        store.set_timestamp("k", Utc::now()).await.unwrap();
        store.clear("k").await.unwrap();
        assert_eq!(store.get_timestamp("k").await.unwrap(), None);
    }

    #[test]
    fn test_last_push_key() {
        assert_eq!(last_push_key("ABC-12"), "last_estimate_push:ABC-12");
    }
}
