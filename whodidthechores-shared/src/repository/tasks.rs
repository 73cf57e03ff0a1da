use tracing::info;
use uuid::Uuid;

use super::Repository;
use crate::classify::{Entity, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{Task, TaskDetails, TaskParams};

impl Repository {
    /// Fails with [`DomainError::NotFound`] if the chore or the user vanished
    /// after validation
    pub async fn create_task(&self, params: &TaskParams) -> DomainResult<Task> {
        self.bounded(Entity::Task, Operation::Create, async {
            let mut scope = self.begin(Entity::Task, Operation::Create).await?;
            let task = Task::insert(scope.conn(), params)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            info!(
                task_id = %task.id,
                chore_id = task.chore_id,
                user_id = task.user_id,
                duration_mn = task.duration_mn,
                "Task recorded"
            );
            Ok(task)
        })
        .await
    }

    pub async fn get_task(&self, id: Uuid) -> DomainResult<Option<Task>> {
        self.bounded(Entity::Task, Operation::Get, async {
            let mut scope = self.begin(Entity::Task, Operation::Get).await?;
            let task = Task::find_by_id(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(task)
        })
        .await
    }

    pub async fn list_tasks(&self) -> DomainResult<Vec<Task>> {
        self.bounded(Entity::Task, Operation::List, async {
            let mut scope = self.begin(Entity::Task, Operation::List).await?;
            let tasks = Task::list(scope.conn()).await.map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(tasks)
        })
        .await
    }

    /// Tasks with their chore and user names, newest first
    pub async fn list_users_tasks(&self) -> DomainResult<Vec<TaskDetails>> {
        self.bounded(Entity::Task, Operation::List, async {
            let mut scope = self.begin(Entity::Task, Operation::List).await?;
            let tasks = Task::list_with_names(scope.conn())
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;
            Ok(tasks)
        })
        .await
    }

    pub async fn update_task(&self, id: Uuid, params: &TaskParams) -> DomainResult<Task> {
        self.bounded(Entity::Task, Operation::Update, async {
            let mut scope = self.begin(Entity::Task, Operation::Update).await?;
            let task = Task::update(scope.conn(), id, params)
                .await
                .map_err(|e| scope.fail(e))?
                .ok_or(DomainError::NotFound)?;
            scope.commit().await?;

            info!(task_id = %task.id, "Task updated");
            Ok(task)
        })
        .await
    }

    pub async fn delete_task(&self, id: Uuid) -> DomainResult<()> {
        self.bounded(Entity::Task, Operation::Delete, async {
            let mut scope = self.begin(Entity::Task, Operation::Delete).await?;
            let deleted = Task::delete(scope.conn(), id)
                .await
                .map_err(|e| scope.fail(e))?;
            if !deleted {
                return Err(DomainError::NotFound);
            }
            scope.commit().await?;

            info!(task_id = %id, "Task deleted");
            Ok(())
        })
        .await
    }
}
