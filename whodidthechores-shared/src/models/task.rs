/// Task model and queries
///
/// A task is one timestamped performance of a chore by a user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE RESTRICT,    -- tasks_user_id_fkey
///     chore_id INTEGER NOT NULL REFERENCES chores (id) ON DELETE RESTRICT,  -- tasks_chore_id_fkey
///     started_at TIMESTAMPTZ NOT NULL,
///     duration_mn INTEGER NOT NULL,                                         -- tasks_duration_mn_check
///     description TEXT NOT NULL DEFAULT ''
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::report::ReportRow;

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: i32,
    pub chore_id: i32,
    pub started_at: DateTime<Utc>,
    pub duration_mn: i32,
    pub description: String,
}

/// Validated input for creating or updating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParams {
    pub user_id: i32,
    pub chore_id: i32,
    pub started_at: DateTime<Utc>,
    pub duration_mn: i32,
    pub description: String,
}

/// A task joined with the names of its chore and user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskDetails {
    pub id: Uuid,
    pub user_id: i32,
    pub user_name: String,
    pub chore_id: i32,
    pub chore_name: String,
    pub started_at: DateTime<Utc>,
    pub duration_mn: i32,
    pub description: String,
}

impl Task {
    pub async fn insert(conn: &mut PgConnection, data: &TaskParams) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, chore_id, started_at, duration_mn, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, chore_id, started_at, duration_mn, description
            "#,
        )
        .bind(data.user_id)
        .bind(data.chore_id)
        .bind(data.started_at)
        .bind(data.duration_mn)
        .bind(&data.description)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, chore_id, started_at, duration_mn, description
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// All tasks, oldest first
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, chore_id, started_at, duration_mn, description
            FROM tasks
            ORDER BY started_at, id
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// All tasks with chore and user names, newest first
    pub async fn list_with_names(conn: &mut PgConnection) -> Result<Vec<TaskDetails>, sqlx::Error> {
        sqlx::query_as::<_, TaskDetails>(
            r#"
            SELECT t.id, t.user_id, u.name AS user_name, t.chore_id, c.name AS chore_name,
                   t.started_at, t.duration_mn, t.description
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            JOIN chores c ON c.id = t.chore_id
            ORDER BY t.started_at DESC, t.id
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// Replaces every editable field. `None` if no task has this id.
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        data: &TaskParams,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET user_id = $2, chore_id = $3, started_at = $4, duration_mn = $5, description = $6
            WHERE id = $1
            RETURNING id, user_id, chore_id, started_at, duration_mn, description
            "#,
        )
        .bind(id)
        .bind(data.user_id)
        .bind(data.chore_id)
        .bind(data.started_at)
        .bind(data.duration_mn)
        .bind(&data.description)
        .fetch_optional(conn)
        .await
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Minutes per (chore, user) pair for tasks started within `[start, end]`
    ///
    /// Both bounds are inclusive. Pairs without any task are absent.
    pub async fn sum_by_chore_and_user(
        conn: &mut PgConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReportRow>, sqlx::Error> {
        sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT c.name AS chore_name, u.name AS user_name, SUM(t.duration_mn)::BIGINT AS minutes
            FROM tasks t
            JOIN chores c ON c.id = t.chore_id
            JOIN users u ON u.id = t.user_id
            WHERE t.started_at >= $1 AND t.started_at <= $2
            GROUP BY c.name, u.name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await
    }
}
