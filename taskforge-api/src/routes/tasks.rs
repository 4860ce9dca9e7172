/// Task endpoints
///
/// All routes here sit behind the bearer-token gate, so handlers receive an
/// [`AuthUser`] extension and every store operation is scoped to that
/// identity. A task that exists but belongs to another user is reported as
/// 404, identically to a task that does not exist at all.
///
/// # Endpoints
///
/// - `GET    /api/tasks`     - list the caller's tasks, newest first
/// - `POST   /api/tasks`     - create a task owned by the caller
/// - `PUT    /api/tasks/:id` - partially update one of the caller's tasks
/// - `DELETE /api/tasks/:id` - delete one of the caller's tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskforge_shared::{
    auth::middleware::AuthUser,
    models::task::{CreateTask, Task, TaskStatus, UpdateTask},
};
use validator::Validate;

/// Create task request
///
/// There is no owner field; the owner is always the authenticated caller.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title, must be non-empty
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status; defaults to "pending" when omitted
    pub status: Option<String>,
}

/// Partial update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title, must be non-empty when present
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<String>,
}

/// Checks a raw status string against the known values.
///
/// Kept as string-level validation so an unknown status is a 400 with a
/// field message like any other constraint violation, not a body
/// deserialization failure.
fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => TaskStatus::parse(s).map(Some).ok_or_else(|| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "status".to_string(),
                message: "Status must be either \"pending\" or \"completed\"".to_string(),
            }])
        }),
    }
}

/// List the caller's tasks, newest first
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token (handled by the gate)
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.id).await?;

    Ok(Json(tasks))
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: missing or invalid token
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    let status = parse_status(req.status.as_deref())?.unwrap_or(TaskStatus::Pending);

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.id,
            title: req.title,
            description: req.description,
            status,
        },
    )
    .await?;

    tracing::info!(user_id = auth.id, task_id = task.id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: missing or invalid token
/// - `404 Not Found`: no task with this id owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    let status = parse_status(req.status.as_deref())?;

    let task = Task::update_owned(
        &state.db,
        id,
        auth.id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(user_id = auth.id, task_id = task.id, "Updated task");

    Ok(Json(task))
}

/// Delete one of the caller's tasks
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token
/// - `404 Not Found`: no task with this id owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_owned(&state.db, id, auth.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::debug!(user_id = auth.id, task_id = id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_validation() {
        let valid = CreateTaskRequest {
            title: "Buy milk".to_string(),
            description: None,
            status: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: "".to_string(),
            description: None,
            status: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_update_task_validation() {
        // All fields optional: the empty update is valid.
        assert!(UpdateTaskRequest::default().validate().is_ok());

        let empty_title = UpdateTaskRequest {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("pending")).unwrap(),
            Some(TaskStatus::Pending)
        );
        assert_eq!(
            parse_status(Some("completed")).unwrap(),
            Some(TaskStatus::Completed)
        );
        assert!(parse_status(Some("done")).is_err());
    }
}
