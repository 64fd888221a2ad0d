//! Task management for a single owner.
//!
//! Every operation is scoped to the authenticated user: tasks belonging to
//! someone else behave exactly like tasks that do not exist. Parent links must
//! point at the owner's own tasks and may never form a cycle.

use serde::Deserialize;

use crate::auth::models::AuthenticatedUser;
use crate::database::models::{Task, TaskRecord};
use crate::database::{is_foreign_key_violation, queries, Database};
use crate::errors::ApiError;

/// Body for creating a task or replacing one.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl TaskInput {
    fn into_record(self) -> Result<TaskRecord, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".into()));
        }
        Ok(TaskRecord {
            title: title.to_string(),
            description: self.description,
            done: self.done,
            parent_id: self.parent_id,
        })
    }
}

pub struct TaskManager<'a> {
    db: &'a Database,
    owner_id: i64,
}

impl<'a> TaskManager<'a> {
    pub fn for_user(db: &'a Database, user: &AuthenticatedUser) -> Self {
        Self {
            db,
            owner_id: user.id(),
        }
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Task>, ApiError> {
        Ok(queries::list_tasks(self.db.pool(), self.owner_id, skip, limit).await?)
    }

    pub async fn children(&self, parent_id: i64, skip: i64, limit: i64) -> Result<Vec<Task>, ApiError> {
        self.get(parent_id).await?;
        Ok(queries::list_children(self.db.pool(), self.owner_id, parent_id, skip, limit).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        queries::get_task(self.db.pool(), self.owner_id, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: TaskInput) -> Result<Task, ApiError> {
        let record = input.into_record()?;
        if let Some(parent_id) = record.parent_id {
            self.ensure_parent(parent_id).await?;
        }
        let task = queries::insert_task(self.db.pool(), self.owner_id, &record).await?;
        tracing::debug!(task_id = task.id, owner_id = self.owner_id, "created task");
        Ok(task)
    }

    /// Replace a task's fields. The parent checks and the write share one
    /// transaction; any failure rolls the write back.
    pub async fn update(&self, id: i64, input: TaskInput) -> Result<Task, ApiError> {
        let record = input.into_record()?;
        let mut tx = self.db.pool().begin().await?;

        // Write first so the transaction holds the write lock while the
        // checks below read the tree.
        let task = queries::update_task(&mut *tx, self.owner_id, id, &record)
            .await
            .map_err(|err| match record.parent_id {
                Some(parent_id) if is_foreign_key_violation(&err) => parent_not_found(parent_id),
                _ => ApiError::from(err),
            })?
            .ok_or_else(|| not_found(id))?;

        if let Some(parent_id) = record.parent_id {
            if queries::get_task(&mut *tx, self.owner_id, parent_id).await?.is_none() {
                return Err(parent_not_found(parent_id));
            }
            // With the new link in place, reaching `id` from the parent means
            // the update closed a loop.
            if queries::is_ancestor_or_self(&mut *tx, id, parent_id).await? {
                return Err(ApiError::Validation(
                    "a task cannot be moved under itself or one of its subtasks".into(),
                ));
            }
        }

        tx.commit().await?;
        tracing::debug!(task_id = id, owner_id = self.owner_id, "updated task");
        Ok(task)
    }

    /// Remove a task and everything below it; returns the removed task.
    pub async fn delete(&self, id: i64) -> Result<Task, ApiError> {
        let task = self.get(id).await?;
        queries::delete_task(self.db.pool(), self.owner_id, id).await?;
        tracing::debug!(task_id = id, owner_id = self.owner_id, "deleted task");
        Ok(task)
    }

    async fn ensure_parent(&self, parent_id: i64) -> Result<(), ApiError> {
        match queries::get_task(self.db.pool(), self.owner_id, parent_id).await? {
            Some(_) => Ok(()),
            None => Err(parent_not_found(parent_id)),
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("task {id} not found"))
}

fn parent_not_found(parent_id: i64) -> ApiError {
    ApiError::Validation(format!("parent task {parent_id} not found"))
}
