/// User model and queries
///
/// Users are the people doing chores. The display name is unique and doubles
/// as the login name. Passwords are stored as Argon2id hashes, never in
/// plaintext.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name TEXT NOT NULL,              -- users_name_key, users_name_check
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     modified_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,

    /// Unique, non-empty, case-sensitive
    pub name: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Validated input for renaming a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserParams {
    pub name: String,
}

/// Input for creating a user
///
/// `password_hash` is the Argon2id hash, not the password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password_hash: String,
}

impl User {
    pub async fn insert(conn: &mut PgConnection, data: &NewUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password_hash)
            VALUES ($1, $2)
            RETURNING id, name, password_hash, created_at, modified_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.password_hash)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, created_at, modified_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Exact-match lookup by name
    pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, created_at, modified_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(conn)
        .await
    }

    /// All users, by name
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, created_at, modified_at
            FROM users
            ORDER BY LOWER(name), name
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// Renames a user. `None` if no user has this id.
    pub async fn rename(
        conn: &mut PgConnection,
        id: i32,
        data: &UserParams,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, modified_at = NOW()
            WHERE id = $1
            RETURNING id, name, password_hash, created_at, modified_at
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .fetch_optional(conn)
        .await
    }

    /// True if a row was deleted. Fails on `tasks_user_id_fkey` while tasks
    /// reference the user; sessions are removed with it.
    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether another user (not `exclude_id`) already uses `name`
    pub async fn name_taken(
        conn: &mut PgConnection,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE name = $1 AND ($2::INTEGER IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }
}
