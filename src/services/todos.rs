//! Todos service
//!
//! Personal task list. Every operation is scoped to the creating user;
//! the optional job link is informational only.

use crate::database::{CreateTodoRequest, LinkableJob, Repository, Todo, UpdateTodoRequest};
use crate::error::{AppError, Result};

/// Service for managing personal todos
#[derive(Clone)]
pub struct TodosService {
    repo: Repository,
}

impl TodosService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_todo(&self, req: CreateTodoRequest, owner: &str) -> Result<Todo> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        // A dangling job link is a validation problem, not a 500
        if let Some(job_id) = &req.job_id {
            self.repo.get_job(job_id).await?;
        }

        self.repo.create_todo(&req, owner).await
    }

    pub async fn get_todo(&self, id: &str, owner: &str) -> Result<Todo> {
        self.repo.get_todo(id, owner).await
    }

    pub async fn list_todos(&self, owner: &str) -> Result<Vec<Todo>> {
        self.repo.list_todos(owner).await
    }

    pub async fn update_todo(
        &self,
        id: &str,
        req: UpdateTodoRequest,
        owner: &str,
    ) -> Result<Todo> {
        let mut todo = self.repo.get_todo(id, owner).await?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title is required".to_string()));
            }
            todo.title = title;
        }
        if let Some(description) = req.description {
            todo.description = Some(description);
        }
        if let Some(completed) = req.completed {
            todo.completed = completed;
        }
        if let Some(priority) = req.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = req.due_date {
            todo.due_date = Some(due_date);
        }
        if let Some(job_id) = req.job_id {
            self.repo.get_job(&job_id).await?;
            todo.job_id = Some(job_id);
        }

        self.repo.update_todo(&todo).await
    }

    pub async fn delete_todo(&self, id: &str, owner: &str) -> Result<()> {
        self.repo.delete_todo(id, owner).await
    }

    /// Jobs offered by the link picker
    pub async fn list_linkable_jobs(&self) -> Result<Vec<LinkableJob>> {
        self.repo.list_linkable_jobs().await
    }
}
