use crate::{
    error::AppError,
    models::{ListInput, ListUpdate, TodoList},
    store::TodoStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Retrieves the lists of `:user_name`, in creation order.
///
/// ## Responses:
/// - `200 OK`: a JSON array of lists.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the token belongs to another user.
#[get("")]
pub async fn get_lists(
    store: web::Data<dyn TodoStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user_name = path.into_inner();

    let lists = store.lists_for_user(&user_name).await?;
    Ok(HttpResponse::Ok().json(lists))
}

/// Retrieves a single list.
///
/// ## Responses:
/// - `200 OK`: the list.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list does not exist or belongs to someone else.
#[get("/{list_id}")]
pub async fn get_list(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id) = path.into_inner();

    match store.find_list(&user_name, &list_id).await? {
        Some(list) => Ok(HttpResponse::Ok().json(list)),
        None => Err(AppError::NotFound("List not found".into())),
    }
}

/// Creates a list for `:user_name`.
///
/// ## Request Body:
/// - `listName`: required.
/// - `listID` (optional): generated when absent; must be unused.
/// - `color` (optional).
///
/// ## Responses:
/// - `201 Created`: the new list.
/// - `400 Bad Request`: invalid payload or `listID` already in use.
/// - `403 Forbidden`: the token belongs to another user.
#[post("")]
pub async fn create_list(
    store: web::Data<dyn TodoStore>,
    path: web::Path<String>,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let user_name = path.into_inner();
    list_data.validate()?;

    if let Some(list_id) = &list_data.list_id {
        if store.list_exists(list_id).await? {
            return Err(AppError::Conflict("List already exists".into()));
        }
    }

    let list = TodoList::new(list_data.into_inner(), &user_name);
    let created = store.insert_list(&list).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Updates `listName` and/or `color` of a list.
///
/// ## Responses:
/// - `200 OK`: the updated list.
/// - `400 Bad Request`: invalid payload.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list does not exist.
#[put("/{list_id}")]
pub async fn update_list(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String)>,
    list_data: web::Json<ListUpdate>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id) = path.into_inner();
    list_data.validate()?;

    match store.update_list(&user_name, &list_id, &list_data).await? {
        Some(list) => Ok(HttpResponse::Ok().json(list)),
        None => Err(AppError::NotFound("List not found".into())),
    }
}

/// Deletes a list together with all of its tasks.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `403 Forbidden`: the token belongs to another user.
/// - `404 Not Found`: the list does not exist.
#[delete("/{list_id}")]
pub async fn delete_list(
    store: web::Data<dyn TodoStore>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, AppError> {
    let (user_name, list_id) = path.into_inner();

    match store.delete_list(&user_name, &list_id).await? {
        Some(removed_tasks) => {
            log::info!(
                "deleted list {} of {} with {} task(s)",
                list_id,
                user_name,
                removed_tasks
            );
            Ok(HttpResponse::Ok().json(json!({ "message": "List deleted" })))
        }
        None => Err(AppError::NotFound("List not found".into())),
    }
}
