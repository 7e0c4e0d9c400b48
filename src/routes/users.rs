use crate::{error::AppError, store::TodoStore};
use actix_web::{get, web, HttpResponse, Responder};

/// Lists every registered user, sorted by `userName`.
#[get("/users")]
pub async fn get_users(store: web::Data<dyn TodoStore>) -> Result<impl Responder, AppError> {
    let users = store.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Returns a single user's public profile.
///
/// ## Responses:
/// - `200 OK`: the user, including the IDs of their lists.
/// - `404 Not Found`: no such user.
#[get("/users/{user_name}")]
pub async fn get_user(
    store: web::Data<dyn TodoStore>,
    user_name: web::Path<String>,
) -> Result<impl Responder, AppError> {
    match store.find_user(&user_name).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
