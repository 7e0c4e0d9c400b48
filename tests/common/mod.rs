#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use tasklists::auth::AuthMiddleware;
use tasklists::config::{JwtConfig, PasswordConfig};
use tasklists::routes::{self, health};
use tasklists::store::{MemoryStore, TodoStore};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        ttl_minutes: 60,
    }
}

/// Builds the full application over `store`, wired the same way as `main`.
pub async fn init_app(
    store: Arc<dyn TodoStore>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(jwt_config()))
            .app_data(web::Data::new(PasswordConfig { bcrypt_cost: 4 }))
            .app_data(routes::json_config())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

pub async fn memory_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    init_app(Arc::new(MemoryStore::new())).await
}

/// Sends `req` and returns the status with the parsed JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("non-JSON body: {:?}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}

pub fn registration(user_name: &str) -> Value {
    json!({
        "userName": user_name,
        "email": format!("{}@example.com", user_name),
        "firstName": "Test",
        "lastName": "User",
        "password": "Password123!"
    })
}

/// Registers `user_name` and returns its access token.
pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    user_name: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(registration(user_name))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    body["token"]
        .as_str()
        .expect("registration returns a token")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn create_list(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    user_name: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/lists", user_name))
        .insert_header(bearer(token))
        .set_json(payload)
        .to_request();
    send(app, req).await
}

pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    user_name: &str,
    list_id: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/lists/{}/tasks", user_name, list_id))
        .insert_header(bearer(token))
        .set_json(payload)
        .to_request();
    send(app, req).await
}
