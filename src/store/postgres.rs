use super::{NewUser, StoreError, User, UserStore};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use std::time::Duration;
use tracing::{debug, info_span, Instrument};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Users collection in one logical Postgres database.
#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
    unique_usernames: bool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            unique_usernames: false,
        }
    }

    /// Build a pool that opens its first connection on first use.
    ///
    /// # Errors
    /// Returns an error if the DSN cannot be parsed.
    pub fn connect_lazy(dsn: &str, acquire_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .acquire_timeout(acquire_timeout)
            .test_before_acquire(true)
            .connect_lazy(dsn)?;

        Ok(Self::new(pool))
    }

    #[must_use]
    pub fn with_unique_usernames(mut self, unique: bool) -> Self {
        self.unique_usernames = unique;
        self
    }

    /// Create the `users` table and index if missing.
    ///
    /// # Errors
    /// Returns an error if the statements fail.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let span = info_span!("db.schema", db.system = "postgresql");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        debug!("users schema ready");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT"
        );
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password FROM users WHERE username = $1 ORDER BY id LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .instrument(span)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<(), StoreError> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT"
        );

        if !self.unique_usernames {
            sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
                .bind(user.username())
                .bind(user.password_hash())
                .execute(&self.pool)
                .instrument(span)
                .await?;

            return Ok(());
        }

        let result = sqlx::query(
            "INSERT INTO users (username, password) \
             SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(user.username())
        .bind(user.password_hash())
        .execute(&self.pool)
        .instrument(span)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        Ok(())
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

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
