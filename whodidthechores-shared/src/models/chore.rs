/// Chore model and queries
///
/// A chore is a recurring task definition. Its name is unique among chores.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chores (
///     id SERIAL PRIMARY KEY,
///     name TEXT NOT NULL,                          -- chores_name_key, chores_name_check
///     description TEXT NOT NULL,
///     default_duration_mn INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     modified_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The functions here run a single statement on a connection the caller
/// provides (normally a transaction opened by the repository) and return raw
/// `sqlx` errors; classification happens one level up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// A stored chore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chore {
    pub id: i32,

    /// Unique, non-empty
    pub name: String,

    pub description: String,

    /// Suggested duration of one performance, in minutes
    pub default_duration_mn: i32,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Validated input for creating or updating a chore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreParams {
    pub name: String,
    pub description: String,
    pub default_duration_mn: i32,
}

impl Chore {
    pub async fn insert(conn: &mut PgConnection, data: &ChoreParams) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Chore>(
            r#"
            INSERT INTO chores (name, description, default_duration_mn)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, default_duration_mn, created_at, modified_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.default_duration_mn)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chore>(
            r#"
            SELECT id, name, description, default_duration_mn, created_at, modified_at
            FROM chores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// All chores, by name
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chore>(
            r#"
            SELECT id, name, description, default_duration_mn, created_at, modified_at
            FROM chores
            ORDER BY LOWER(name), name
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// Replaces every editable field. `None` if no chore has this id.
    pub async fn update(
        conn: &mut PgConnection,
        id: i32,
        data: &ChoreParams,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chore>(
            r#"
            UPDATE chores
            SET name = $2, description = $3, default_duration_mn = $4, modified_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, default_duration_mn, created_at, modified_at
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.default_duration_mn)
        .fetch_optional(conn)
        .await
    }

    /// True if a row was deleted
    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chores WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether another chore (not `exclude_id`) already uses `name`
    ///
    /// Exact, case-sensitive match.
    pub async fn name_taken(
        conn: &mut PgConnection,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM chores
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
