//! Task CRUD pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, instrument};

use orchard_core::TaskId;

use crate::db::TaskRepository;
use crate::error::{AppError, Result};
use crate::layout::{LayoutTemplate, render_page};
use crate::middleware::CsrfToken;
use crate::models::{Task, TaskForm};
use crate::state::AppState;

/// Where every successful write sends the browser.
pub const INDEX_PATH: &str = "/tasks";

/// Task list fragment.
#[derive(Template)]
#[template(path = "tasks/index.html")]
pub struct TasksIndexTemplate {
    pub tasks: Vec<Task>,
    pub csrf_token: String,
}

/// New task form fragment.
#[derive(Template, Default)]
#[template(path = "tasks/create.html")]
pub struct TaskCreateTemplate {
    pub csrf_token: String,
    pub title: String,
    pub description: String,
    pub errors: Vec<String>,
}

/// Edit form fragment, prefilled with the stored or submitted values.
#[derive(Template)]
#[template(path = "tasks/edit.html")]
pub struct TaskEditTemplate {
    pub id: TaskId,
    pub csrf_token: String,
    pub title: String,
    pub description: String,
    pub errors: Vec<String>,
}

/// Single task fragment.
#[derive(Template)]
#[template(path = "tasks/show.html")]
pub struct TaskShowTemplate {
    pub task: Task,
}

/// Ids that do not parse name no task, so they are answered like a missing row.
fn parse_id(raw: &str) -> Result<TaskId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("task {raw}")))
}

async fn find(state: &AppState, id: TaskId) -> Result<Task> {
    TaskRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {id}")))
}

/// List all tasks.
#[instrument(skip(state, csrf))]
pub async fn index(State(state): State<AppState>, csrf: CsrfToken) -> Result<LayoutTemplate> {
    let tasks = TaskRepository::new(state.pool()).list().await?;
    render_page(
        "Tasks",
        &TasksIndexTemplate {
            tasks,
            csrf_token: csrf.0,
        },
    )
}

/// Show the empty create form.
#[instrument(skip(csrf))]
pub async fn create(csrf: CsrfToken) -> Result<LayoutTemplate> {
    render_page(
        "Create Task",
        &TaskCreateTemplate {
            csrf_token: csrf.0,
            ..TaskCreateTemplate::default()
        },
    )
}

/// Validate and store a new task.
#[instrument(skip(state, csrf, form))]
pub async fn store(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Form(form): Form<TaskForm>,
) -> Result<Response> {
    match form.validate() {
        Ok(input) => {
            let task = TaskRepository::new(state.pool()).create(&input).await?;
            info!(task_id = %task.id, "Task created");
            Ok(Redirect::to(INDEX_PATH).into_response())
        }
        Err(errors) => {
            let page = render_page(
                "Create Task",
                &TaskCreateTemplate {
                    csrf_token: csrf.0,
                    title: form.title,
                    description: form.description,
                    errors: errors.0,
                },
            )?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Show one task.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<LayoutTemplate> {
    let task = find(&state, parse_id(&id)?).await?;
    render_page(task.title.clone(), &TaskShowTemplate { task })
}

/// Show the edit form for an existing task.
#[instrument(skip(state, csrf))]
pub async fn edit(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Path(id): Path<String>,
) -> Result<LayoutTemplate> {
    let task = find(&state, parse_id(&id)?).await?;
    render_page(
        "Edit Task",
        &TaskEditTemplate {
            id: task.id,
            csrf_token: csrf.0,
            title: task.title,
            description: task.description,
            errors: Vec::new(),
        },
    )
}

/// Validate and apply changes to a task.
#[instrument(skip(state, csrf, form))]
pub async fn update(
    State(state): State<AppState>,
    csrf: CsrfToken,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> Result<Response> {
    let id = parse_id(&id)?;

    match form.validate() {
        Ok(input) => {
            let task = TaskRepository::new(state.pool()).update(id, &input).await?;
            info!(task_id = %task.id, "Task updated");
            Ok(Redirect::to(INDEX_PATH).into_response())
        }
        Err(errors) => {
            // A form for a task that no longer exists is a 404, not a 422.
            find(&state, id).await?;
            let page = render_page(
                "Edit Task",
                &TaskEditTemplate {
                    id,
                    csrf_token: csrf.0,
                    title: form.title,
                    description: form.description,
                    errors: errors.0,
                },
            )?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Delete a task.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_id(&id)?;
    TaskRepository::new(state.pool()).delete(id).await?;
    info!(task_id = %id, "Task deleted");
    Ok(Redirect::to(INDEX_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn task(id: i64, title: &str, description: &str) -> Task {
        Task {
            id: TaskId::new(id),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_renders_actions_for_each_task() {
        let html = TasksIndexTemplate {
            tasks: vec![task(1, "Buy milk", "2 litres"), task(2, "Walk dog", "Park")],
            csrf_token: "tok".to_string(),
        }
        .render()
        .unwrap();

        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("Buy milk"));
        assert!(html.contains("2 litres"));
        for id in [1, 2] {
            assert_eq!(html.matches(&format!("href=\"/tasks/{id}/edit\"")).count(), 1);
            assert_eq!(html.matches(&format!("href=\"/tasks/{id}\"")).count(), 1);
            assert_eq!(html.matches(&format!("action=\"/tasks/{id}\"")).count(), 1);
        }
        assert_eq!(html.matches("name=\"_method\" value=\"DELETE\"").count(), 2);
        assert_eq!(html.matches("name=\"_token\" value=\"tok\"").count(), 2);
        assert!(!html.contains("No tasks found"));
    }

    #[test]
    fn test_index_without_tasks_shows_placeholder() {
        let html = TasksIndexTemplate {
            tasks: Vec::new(),
            csrf_token: "tok".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.contains("No tasks found"));
        assert!(!html.contains("/edit"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_index_escapes_task_text() {
        let html = TasksIndexTemplate {
            tasks: vec![task(3, "<script>x</script>", "a & b")],
            csrf_token: "tok".to_string(),
        }
        .render()
        .unwrap();

        assert!(!html.contains("<script>"));
        assert!(!html.contains("a & b"));
    }

    #[test]
    fn test_create_form_is_empty() {
        let html = TaskCreateTemplate {
            csrf_token: "tok".to_string(),
            ..TaskCreateTemplate::default()
        }
        .render()
        .unwrap();

        assert!(html.contains("action=\"/tasks\""));
        assert!(html.contains("method=\"post\""));
        assert!(html.contains("name=\"title\""));
        assert!(html.contains("name=\"description\""));
        assert_eq!(html.matches("value=\"\"").count(), 2);
        assert!(html.contains(">Create</button>"));
        assert!(!html.contains("_method"));
        assert!(!html.contains("class=\"errors\""));
    }

    #[test]
    fn test_create_form_keeps_old_input_and_errors() {
        let html = TaskCreateTemplate {
            csrf_token: "tok".to_string(),
            title: "Draft".to_string(),
            description: String::new(),
            errors: vec!["The description field is required.".to_string()],
        }
        .render()
        .unwrap();

        assert!(html.contains("value=\"Draft\""));
        assert!(html.contains("<li>The description field is required.</li>"));
    }

    #[test]
    fn test_edit_form_targets_task_with_put() {
        let html = TaskEditTemplate {
            id: TaskId::new(7),
            csrf_token: "tok".to_string(),
            title: "A".to_string(),
            description: "B".to_string(),
            errors: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("action=\"/tasks/7\""));
        assert!(html.contains("name=\"_method\" value=\"PUT\""));
        assert!(html.contains("name=\"title\" value=\"A\""));
        assert!(html.contains("name=\"description\" value=\"B\""));
        assert!(html.contains(">Update</button>"));
    }

    #[test]
    fn test_show_renders_task() {
        let html = TaskShowTemplate {
            task: task(4, "Read", "Chapter 2"),
        }
        .render()
        .unwrap();

        assert!(html.contains("<h1>Read</h1>"));
        assert!(html.contains("Chapter 2"));
        assert!(html.contains("href=\"/tasks/4/edit\""));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), TaskId::new(12));
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("0"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("-1"), Err(AppError::NotFound(_))));
    }
}
