use tracing::info;

use super::Repository;
use crate::classify::{Entity, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{NewUser, User, UserParams};

impl Repository {
    /// Stores a user with an already hashed password
    ///
    /// A concurrent create with the same name loses on `users_name_key` and
    /// gets [`DomainError::DuplicateName`].
    pub async fn create_user(&self, data: &NewUser) -> DomainResult<User> {
        self.bounded(Entity::User, Operation::Create, async {
            let mut scope = self.begin(Entity::User, Operation::Create).await?;
            let user = User::insert(scope.conn(), data)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            info!(user_id = user.id, name = %user.name, "User created");
            Ok(user)
        })
        .await
    }

    pub async fn get_user(&self, id: i32) -> DomainResult<Option<User>> {
        self.bounded(Entity::User, Operation::Get, async {
            let mut scope = self.begin(Entity::User, Operation::Get).await?;
            let user = User::find_by_id(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(user)
        })
        .await
    }

    /// Exact, case-sensitive match on the display name
    pub async fn find_user_by_name(&self, name: &str) -> DomainResult<Option<User>> {
        self.bounded(Entity::User, Operation::Lookup, async {
            let mut scope = self.begin(Entity::User, Operation::Lookup).await?;
            let user = User::find_by_name(scope.conn(), name)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(user)
        })
        .await
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.bounded(Entity::User, Operation::List, async {
            let mut scope = self.begin(Entity::User, Operation::List).await?;
            let users = User::list(scope.conn()).await.map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(users)
        })
        .await
    }

    /// Renames a user
    pub async fn update_user(&self, id: i32, params: &UserParams) -> DomainResult<User> {
        self.bounded(Entity::User, Operation::Update, async {
            let mut scope = self.begin(Entity::User, Operation::Update).await?;
            let user = User::rename(scope.conn(), id, params)
                .await
                .map_err(|e| scope.fail(e))?
                .ok_or(DomainError::NotFound)?;
            scope.commit().await?;

            info!(user_id = user.id, name = %user.name, "User renamed");
            Ok(user)
        })
        .await
    }

    /// Fails with [`DomainError::StillInUse`] while tasks reference the user.
    /// The user's sessions go with it.
    pub async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.bounded(Entity::User, Operation::Delete, async {
            let mut scope = self.begin(Entity::User, Operation::Delete).await?;
            let deleted = User::delete(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            if !deleted {
                return Err(DomainError::NotFound);
            }
            scope.commit().await?;

            info!(user_id = id, "User deleted");
            Ok(())
        })
        .await
    }

    pub async fn user_name_taken(&self, name: &str, exclude_id: Option<i32>) -> DomainResult<bool> {
        self.bounded(Entity::User, Operation::Lookup, async {
            let mut scope = self.begin(Entity::User, Operation::Lookup).await?;
            let taken = User::name_taken(scope.conn(), name, exclude_id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(taken)
        })
        .await
    }
}
