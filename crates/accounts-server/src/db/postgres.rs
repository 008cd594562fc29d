//! PostgreSQL-backed user store

use async_trait::async_trait;
use sqlx::PgPool;

use super::{escape_like, DbError, DbResult, UserStore};
use crate::features::shared::error_helpers::is_unique_violation;
use crate::models::{NewUser, UserChanges, UserFilter, UserRecord};

const USER_COLUMNS: &str = "id, username, password, created_at, updated_at";

/// [`UserStore`] over the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> DbResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::duplicate("User", &user.username)
                } else {
                    DbError::Sqlx(e)
                }
            })
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        filter: &UserFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<(Vec<UserRecord>, u64)> {
        let pattern = filter
            .username
            .as_deref()
            .map(|name| format!("%{}%", escape_like(name)));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::TEXT IS NULL OR username LIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::TEXT IS NULL OR username LIKE $1)
            ORDER BY id ASC
            LIMIT $2
            OFFSET $3
            "#,
            USER_COLUMNS
        );

        let records = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total.max(0) as u64))
    }

    #[tracing::instrument(skip(self, changes), fields(username = %changes.username))]
    async fn update(&self, id: i64, changes: UserChanges) -> DbResult<Option<UserRecord>> {
        let sql = format!(
            r#"
            UPDATE users
            SET username = $2, password = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(&changes.username)
            .bind(&changes.password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::duplicate("User", &changes.username)
                } else {
                    DbError::Sqlx(e)
                }
            })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
