pub mod auth;
pub mod health;
pub mod lists;
pub mod tasks;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::auth::OwnerGuard;
use crate::error::AppError;

/// Registers every `/api` route. Mount inside a scope wrapped with
/// [`AuthMiddleware`](crate::auth::AuthMiddleware).
///
/// List and task routes live under `/users/{user_name}/lists`, where
/// [`OwnerGuard`] admits only the owner of `{user_name}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::register)
        .service(users::get_users)
        .service(users::get_user)
        .service(
            web::scope("/users/{user_name}/lists")
                .wrap(OwnerGuard)
                .service(lists::get_lists)
                .service(lists::create_list)
                .service(lists::get_list)
                .service(lists::update_list)
                .service(lists::delete_list)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// JSON extractor settings that report unreadable bodies as `{"message"}` 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}
