/// Session lifecycle
///
/// ```text
/// anonymous --sign_up/login--> authenticated --logout/expiry--> anonymous
/// ```
///
/// A session is valid while `now <= expires_at`. Validity is checked lazily
/// on every [`SessionManager::get_session`]; nothing sweeps expired rows.
/// Each successful check records `last_used_at`, which never moves the
/// expiry.
///
/// Every authentication failure is the same [`DomainError::AuthenticationFailed`]:
/// callers cannot tell an unknown name from a wrong password, or a missing
/// session from an expired one.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::password::{check_password_complexity, hash_password_async, verify_password_async};
use crate::error::{DomainError, DomainResult, ValidationErrors};
use crate::models::{AuthenticatedSession, NewSession, NewUser};
use crate::repository::Repository;

/// Lifetime of a session from its creation
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Longest lifetime a session may be given (366 days)
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

/// Signs users up and in, and resolves their sessions
#[derive(Debug, Clone)]
pub struct SessionManager {
    repo: Repository,
    ttl: chrono::Duration,
}

impl SessionManager {
    pub fn new(repo: Repository) -> Self {
        Self::with_ttl(repo, DEFAULT_SESSION_TTL)
    }

    /// Sessions live for `ttl`, capped at [`MAX_SESSION_TTL`]
    pub fn with_ttl(repo: Repository, ttl: Duration) -> Self {
        if ttl > MAX_SESSION_TTL {
            warn!(
                requested_seconds = ttl.as_secs(),
                max_seconds = MAX_SESSION_TTL.as_secs(),
                "Session lifetime capped"
            );
        }
        let ttl = chrono::Duration::from_std(ttl.min(MAX_SESSION_TTL))
            .unwrap_or(chrono::Duration::days(366));
        Self { repo, ttl }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Creates an account and opens its first session
    ///
    /// The password strength is checked before anything is hashed or
    /// stored: a weak password leaves no user row behind.
    pub async fn sign_up(&self, name: &str, password: &str) -> DomainResult<AuthenticatedSession> {
        let mut errors = ValidationErrors::new();
        errors.check("password", check_password_complexity(password));
        if !errors.is_empty() {
            info!("Signup refused: weak password");
            return Err(errors.into());
        }

        let password_hash = hash_password_async(password.to_string()).await?;
        let user = self
            .repo
            .create_user(&NewUser {
                name: name.trim().to_string(),
                password_hash,
            })
            .await?;

        self.issue(user.id, Utc::now()).await
    }

    /// Opens a session for a name and password
    pub async fn login(&self, name: &str, password: &str) -> DomainResult<AuthenticatedSession> {
        let user = self.repo.find_user_by_name(name.trim()).await?;

        // Unknown names still pay for a verification
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => dummy_hash().await?.to_string(),
        };
        let verified = verify_password_async(password.to_string(), hash).await?;

        match user {
            Some(user) if verified => {
                info!(user_id = user.id, "Login succeeded");
                self.issue(user.id, Utc::now()).await
            }
            _ => {
                info!("Login failed");
                Err(DomainError::AuthenticationFailed)
            }
        }
    }

    /// Deletes the session server-side
    ///
    /// Logging out of a session that is already gone is not an error.
    pub async fn logout(&self, session_id: Uuid) -> DomainResult<()> {
        if self.repo.delete_session(session_id).await? {
            info!(session_id = %session_id, "Logged out");
        }
        Ok(())
    }

    /// Resolves a live session and its user
    pub async fn get_session(&self, session_id: Uuid) -> DomainResult<AuthenticatedSession> {
        self.get_session_at(session_id, Utc::now()).await
    }

    /// [`SessionManager::get_session`] as seen at `now`
    pub async fn get_session_at(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<AuthenticatedSession> {
        let Some(mut found) = self.repo.find_session(session_id).await? else {
            return Err(DomainError::AuthenticationFailed);
        };

        if found.session.is_expired_at(now) {
            info!(
                session_id = %session_id,
                expired_at = %found.session.expires_at,
                "Rejected expired session"
            );
            return Err(DomainError::AuthenticationFailed);
        }

        // Bookkeeping only; a failed touch does not fail the request
        match self.repo.touch_session(session_id, now).await {
            Ok(_) => found.session.last_used_at = now,
            Err(e) => warn!(session_id = %session_id, error = %e, "Failed to touch session"),
        }

        Ok(found)
    }

    async fn issue(&self, user_id: i32, now: DateTime<Utc>) -> DomainResult<AuthenticatedSession> {
        let expires_at = self.expiry(now)?;
        self.repo
            .create_session(&NewSession {
                id: Uuid::new_v4(),
                user_id,
                created_at: now,
                expires_at,
            })
            .await
    }

    fn expiry(&self, now: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        now.checked_add_signed(self.ttl).ok_or_else(|| {
            error!(%now, ttl = %self.ttl, "Session expiry out of range");
            DomainError::Storage
        })
    }
}

/// A valid hash of a password nobody has, computed once off the request thread
async fn dummy_hash() -> DomainResult<&'static str> {
    static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password_async(Uuid::new_v4().to_string()))
        .await?;
    Ok(hash.as_str())
}
