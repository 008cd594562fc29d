//! User storage
//!
//! [`UserStore`] is the narrow contract the rest of the server programs
//! against. [`PgUserStore`] is the production implementation; [`MemoryUserStore`]
//! keeps everything in process and backs the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::models::{NewUser, UserChanges, UserFilter, UserRecord};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Storage errors surfaced to commands and queries
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record already exists (unique constraint violation)
    #[error("{0}")]
    Duplicate(String),
}

impl DbError {
    /// Create a duplicate error with resource context
    pub fn duplicate(resource_type: &str, identifier: &str) -> Self {
        Self::Duplicate(format!("{} '{}' already exists", resource_type, identifier))
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Persistence operations over user accounts
///
/// Only live (not soft-deleted) users are ever returned.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a user, failing with [`DbError::Duplicate`] if the username is taken
    async fn create(&self, user: NewUser) -> DbResult<UserRecord>;

    async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>>;

    /// One page of users in ascending id order, plus the total matching count
    async fn list(
        &self,
        filter: &UserFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<UserRecord>, u64)>;

    /// Replace username and password; `None` if no live user has `id`
    async fn update(&self, id: i64, changes: UserChanges) -> DbResult<Option<UserRecord>>;

    /// Soft delete; `false` if no live user has `id`
    async fn delete(&self, id: i64) -> DbResult<bool>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> DbResult<()>;
}

/// Build the PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool established"
    );

    Ok(pool)
}

/// Escape LIKE wildcards so user input matches literally
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
