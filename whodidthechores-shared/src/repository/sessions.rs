use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::Repository;
use crate::classify::{Entity, Operation};
use crate::error::DomainResult;
use crate::models::{AuthenticatedSession, NewSession, Session};

impl Repository {
    /// Fails with [`crate::DomainError::NotFound`] if the user does not exist
    pub async fn create_session(&self, data: &NewSession) -> DomainResult<AuthenticatedSession> {
        self.bounded(Entity::Session, Operation::Create, async {
            let mut scope = self.begin(Entity::Session, Operation::Create).await?;
            let session = Session::insert(scope.conn(), data)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            debug!(
                user_id = session.user.id,
                expires_at = %session.session.expires_at,
                "Session created"
            );
            Ok(session)
        })
        .await
    }

    /// The stored session and its user, expired or not
    pub async fn find_session(&self, id: Uuid) -> DomainResult<Option<AuthenticatedSession>> {
        self.bounded(Entity::Session, Operation::Get, async {
            let mut scope = self.begin(Entity::Session, Operation::Get).await?;
            let session = Session::find_with_user(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(session)
        })
        .await
    }

    /// Sets `last_used_at`; `expires_at` is left alone
    pub async fn touch_session(&self, id: Uuid, used_at: DateTime<Utc>) -> DomainResult<bool> {
        self.bounded(Entity::Session, Operation::Touch, async {
            let mut scope = self.begin(Entity::Session, Operation::Touch).await?;
            let touched = Session::touch(scope.conn(), id, used_at)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(touched)
        })
        .await
    }

    /// True if a session was removed
    pub async fn delete_session(&self, id: Uuid) -> DomainResult<bool> {
        self.bounded(Entity::Session, Operation::Delete, async {
            let mut scope = self.begin(Entity::Session, Operation::Delete).await?;
            let deleted = Session::delete(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(deleted)
        })
        .await
    }
}
