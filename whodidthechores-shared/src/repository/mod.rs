/// Persistence gateway
///
/// [`Repository`] is the transactional front of the models. Every public
/// operation:
///
/// 1. runs under a deadline (`statement_timeout`, 10 seconds by default);
/// 2. opens its own transaction, which rolls back when dropped;
/// 3. commits explicitly once every statement succeeded;
/// 4. passes driver errors through [`crate::classify`].
///
/// The repository is cheap to clone; clones share the pool.
///
/// # Example
///
/// ```no_run
/// use whodidthechores_shared::db::pool::{create_pool, DatabaseConfig};
/// use whodidthechores_shared::models::ChoreParams;
/// use whodidthechores_shared::Repository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::from_url("postgresql://localhost/whodidthechores")?).await?;
/// let repo = Repository::new(pool);
///
/// let chore = repo
///     .create_chore(&ChoreParams {
///         name: "Dishes".to_string(),
///         description: "Wash, dry, put away".to_string(),
///         default_duration_mn: 20,
///     })
///     .await?;
///
/// assert_eq!(repo.get_chore(chore.id).await?, Some(chore));
/// # Ok(())
/// # }
/// ```

mod chores;
mod reports;
mod sessions;
mod tasks;
mod users;

use std::future::Future;
use std::time::Duration;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::error;

use crate::classify::{classify, Entity, Operation};
use crate::error::{DomainError, DomainResult};

/// Default deadline for one gateway call
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transactional access to chores, users, tasks, sessions and reports
#[derive(Debug, Clone)]
pub struct Repository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    /// Opens a transaction for one gateway call
    pub(crate) async fn begin(&self, entity: Entity, operation: Operation) -> DomainResult<Scope> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(entity, operation, e))?;

        Ok(Scope {
            tx,
            entity,
            operation,
        })
    }

    /// Runs `fut` under the statement deadline
    ///
    /// On expiry the future is dropped, which drops any open [`Scope`] and
    /// rolls its transaction back.
    pub(crate) async fn bounded<T, F>(
        &self,
        entity: Entity,
        operation: Operation,
        fut: F,
    ) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    entity = %entity,
                    operation = %operation,
                    timeout_ms = self.statement_timeout.as_millis() as u64,
                    "Storage call exceeded its deadline"
                );
                Err(DomainError::Storage)
            }
        }
    }
}

/// One gateway call's transaction
///
/// Dropping the scope without calling [`Scope::commit`] rolls back. After a
/// commit the transaction is consumed, so there is nothing left to roll back.
pub(crate) struct Scope {
    tx: Transaction<'static, Postgres>,
    entity: Entity,
    operation: Operation,
}

impl Scope {
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }

    /// Classifies a driver error in the context of this call
    pub(crate) fn fail(&self, err: sqlx::Error) -> DomainError {
        classify(self.entity, self.operation, err)
    }

    pub(crate) async fn commit(self) -> DomainResult<()> {
        let (entity, operation) = (self.entity, self.operation);
        self.tx
            .commit()
            .await
            .map_err(|e| classify(entity, operation, e))
    }
}
