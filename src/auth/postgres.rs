//! Postgres-backed credential store.

use sqlx::{postgres::PgPoolOptions, Connection, PgPool, Row};
use std::time::Duration;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::{
    error::StoreError,
    store::CredentialStore,
    types::{Credential, Email, PasswordHash, UserId},
};

/// Table definition expected by [`PgStore`].
pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the database cannot be reached.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await?;

        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `users` table if it does not exist.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if any statement fails.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

impl CredentialStore for PgStore {
    async fn upsert(&self, email: &Email, password_hash: &PasswordHash) -> Result<UserId, StoreError> {
        // ON CONFLICT serializes concurrent writers on the unique email index.
        let query = r"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE
                SET password_hash = EXCLUDED.password_hash,
                    updated_at = NOW()
            RETURNING id
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email.as_str())
            .bind(password_hash.as_str())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        let Some(row) = row else {
            return Err(StoreError::Inconsistent);
        };

        let id: Uuid = row.try_get("id")?;

        Ok(UserId::from(id))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Credential>, StoreError> {
        let query = "SELECT id, email, password_hash FROM users WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: Uuid = row.try_get("id")?;
        let stored_email: String = row.try_get("email")?;
        let password_hash: Option<String> = row.try_get("password_hash")?;

        Ok(Some(Credential::new(
            UserId::from(id),
            Email::new(stored_email)?,
            PasswordHash::new(password_hash.unwrap_or_default())?,
        )))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_unique_email() {
        assert!(SCHEMA_SQL.contains("email         TEXT        NOT NULL UNIQUE"));
        assert!(SCHEMA_SQL.contains("gen_random_uuid()"));
    }

    #[test]
    fn sqlx_errors_are_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
