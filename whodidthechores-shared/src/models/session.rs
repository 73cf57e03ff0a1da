/// Session model and queries
///
/// A session is a time-bounded authentication grant for one user. Validity
/// depends only on `expires_at`: a row past its expiry is dead even though it
/// still exists. `last_used_at` is bookkeeping and never moves `expires_at`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_sessions (
///     id UUID PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL,
///     CHECK (expires_at > created_at)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

use super::user::User;

/// A stored session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is dead once `now` is past `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: Uuid,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A session together with the user it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub user: User,
}

/// Flat row of `user_sessions JOIN users`
#[derive(sqlx::FromRow)]
struct SessionUserRow {
    id: Uuid,
    user_id: i32,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    user_name: String,
    user_password_hash: String,
    user_created_at: DateTime<Utc>,
    user_modified_at: DateTime<Utc>,
}

impl From<SessionUserRow> for AuthenticatedSession {
    fn from(row: SessionUserRow) -> Self {
        AuthenticatedSession {
            session: Session {
                id: row.id,
                user_id: row.user_id,
                created_at: row.created_at,
                last_used_at: row.last_used_at,
                expires_at: row.expires_at,
            },
            user: User {
                id: row.user_id,
                name: row.user_name,
                password_hash: row.user_password_hash,
                created_at: row.user_created_at,
                modified_at: row.user_modified_at,
            },
        }
    }
}

impl Session {
    pub async fn insert(conn: &mut PgConnection, data: &NewSession) -> Result<AuthenticatedSession, sqlx::Error> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            WITH inserted AS (
                INSERT INTO user_sessions (id, user_id, created_at, last_used_at, expires_at)
                VALUES ($1, $2, $3, $3, $4)
                RETURNING id, user_id, created_at, last_used_at, expires_at
            )
            SELECT s.id, s.user_id, s.created_at, s.last_used_at, s.expires_at,
                   u.name AS user_name, u.password_hash AS user_password_hash,
                   u.created_at AS user_created_at, u.modified_at AS user_modified_at
            FROM inserted s
            JOIN users u ON u.id = s.user_id
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    pub async fn find_with_user(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<AuthenticatedSession>, sqlx::Error> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT s.id, s.user_id, s.created_at, s.last_used_at, s.expires_at,
                   u.name AS user_name, u.password_hash AS user_password_hash,
                   u.created_at AS user_created_at, u.modified_at AS user_modified_at
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Records use of the session. Only `last_used_at` changes.
    pub async fn touch(
        conn: &mut PgConnection,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE user_sessions SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(used_at)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
