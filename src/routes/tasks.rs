use crate::{
    error::AppError,
    models::{Task, TaskInput, TaskUpdate, TodoList},
    store::TodoStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Resolves the parent list, scoped to its owner.
async fn owned_list(
    store: &dyn TodoStore,
    user_name: &str,
    list_id: &str,
) -> Result<TodoList, AppError> {
    store
        .find_list(user_name, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))
}

/// Retrieves the tasks of a list, in creation order.
///
/// ## Responses:
/// - `200 OK`: a JSON array of tasks.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list does not exist.
#[get("/{list_id}/tasks")]
pub async fn get_tasks(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id) = path.into_inner();

    let list = owned_list(store.get_ref(), &user_name, &list_id).await?;
    let tasks = store.tasks_for_list(&list.list_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task.
#[get("/{list_id}/tasks/{task_id}")]
pub async fn get_task(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String, String)>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id, task_id) = path.into_inner();

    let list = owned_list(store.get_ref(), &user_name, &list_id).await?;
    match store.find_task(&list.list_id, &task_id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Creates a task in a list.
///
/// ## Request Body:
/// - `taskName`: required.
/// - `taskID` (optional): generated when absent; must be unused.
/// - `notes`, `priority`, `completed` (optional).
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: invalid payload or `taskID` already in use.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list does not exist.
#[post("/{list_id}/tasks")]
pub async fn create_task(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String)>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id) = path.into_inner();
    task_data.validate()?;

    let list = owned_list(store.get_ref(), &user_name, &list_id).await?;

    if let Some(task_id) = &task_data.task_id {
        if store.task_exists(task_id).await? {
            return Err(AppError::Conflict("Task already exists".into()));
        }
    }

    let task = Task::new(task_data.into_inner(), &list.list_id);
    let created = store.insert_task(&task).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Updates any of `taskName`, `notes`, `priority`, `completed`.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: invalid payload.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list or the task does not exist.
#[put("/{list_id}/tasks/{task_id}")]
pub async fn update_task(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String, String)>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id, task_id) = path.into_inner();
    task_data.validate()?;

    let list = owned_list(store.get_ref(), &user_name, &list_id).await?;
    match store.update_task(&list.list_id, &task_id, &task_data).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list or the task does not exist.
#[delete("/{list_id}/tasks/{task_id}")]
pub async fn delete_task(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String, String)>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id, task_id) = path.into_inner();

    let list = owned_list(store.get_ref(), &user_name, &list_id).await?;
    if !store.delete_task(&list.list_id, &task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
