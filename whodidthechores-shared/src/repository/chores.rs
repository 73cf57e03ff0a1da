use tracing::{debug, info};

use super::Repository;
use crate::classify::{Entity, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{Chore, ChoreParams};

impl Repository {
    pub async fn create_chore(&self, params: &ChoreParams) -> DomainResult<Chore> {
        self.bounded(Entity::Chore, Operation::Create, async {
            let mut scope = self.begin(Entity::Chore, Operation::Create).await?;
            let chore = Chore::insert(scope.conn(), params)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            info!(chore_id = chore.id, name = %chore.name, "Chore created");
            Ok(chore)
        })
        .await
    }

    /// `None` when no chore has this id
    pub async fn get_chore(&self, id: i32) -> DomainResult<Option<Chore>> {
        self.bounded(Entity::Chore, Operation::Get, async {
            let mut scope = self.begin(Entity::Chore, Operation::Get).await?;
            let chore = Chore::find_by_id(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(chore)
        })
        .await
    }

    pub async fn list_chores(&self) -> DomainResult<Vec<Chore>> {
        self.bounded(Entity::Chore, Operation::List, async {
            let mut scope = self.begin(Entity::Chore, Operation::List).await?;
            let chores = Chore::list(scope.conn()).await.map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(chores)
        })
        .await
    }

    /// Fails with [`DomainError::NotFound`] when no chore has this id
    pub async fn update_chore(&self, id: i32, params: &ChoreParams) -> DomainResult<Chore> {
        self.bounded(Entity::Chore, Operation::Update, async {
            let mut scope = self.begin(Entity::Chore, Operation::Update).await?;
            let chore = Chore::update(scope.conn(), id, params)
                .await
                .map_err(|e| scope.fail(e))?
                .ok_or(DomainError::NotFound)?;
            scope.commit().await?;

            info!(chore_id = chore.id, "Chore updated");
            Ok(chore)
        })
        .await
    }

    /// Fails with [`DomainError::StillInUse`] while tasks reference the chore
    pub async fn delete_chore(&self, id: i32) -> DomainResult<()> {
        self.bounded(Entity::Chore, Operation::Delete, async {
            let mut scope = self.begin(Entity::Chore, Operation::Delete).await?;
            let deleted = Chore::delete(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            if !deleted {
                return Err(DomainError::NotFound);
            }
            scope.commit().await?;

            info!(chore_id = id, "Chore deleted");
            Ok(())
        })
        .await
    }

    /// Whether a chore other than `exclude_id` is named `name`
    pub async fn chore_name_taken(&self, name: &str, exclude_id: Option<i32>) -> DomainResult<bool> {
        self.bounded(Entity::Chore, Operation::Lookup, async {
            let mut scope = self.begin(Entity::Chore, Operation::Lookup).await?;
            let taken = Chore::name_taken(scope.conn(), name, exclude_id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            debug!(name, taken, "Checked chore name");
            Ok(taken)
        })
        .await
    }
}
