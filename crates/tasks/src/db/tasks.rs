//! Task repository.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so the crate
//! builds without a live database or an offline query cache.

use sqlx::PgPool;
use tracing::{debug, instrument};

use orchard_core::TaskId;

use super::RepositoryError;
use crate::models::{Task, TaskInput};

/// Repository for task database operations.
pub struct TaskRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskRepository<'a> {
    /// Create a new task repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let tasks = sqlx::query_as::<_, Task>(
            r"
            SELECT id, title, description, created_at, updated_at
            FROM tasks
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Get a task by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        let task = sqlx::query_as::<_, Task>(
            r"
            SELECT id, title, description, created_at, updated_at
            FROM tasks
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(task)
    }

    /// Insert a new task and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError> {
        let task = sqlx::query_as::<_, Task>(
            r"
            INSERT INTO tasks (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at, updated_at
            ",
        )
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await?;

        debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Replace a task's title and description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no task has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update(&self, id: TaskId, input: &TaskInput) -> Result<Task, RepositoryError> {
        sqlx::query_as::<_, Task>(
            r"
            UPDATE tasks
            SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no task has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete(&self, id: TaskId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!("Deleted task");
        Ok(())
    }
}
