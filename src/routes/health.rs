use crate::store::TodoStore;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Reports whether the storage backend answers. Served outside `/api`, no token needed.
#[get("/health")]
pub async fn health(store: web::Data<dyn TodoStore>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "storage": store.backend(),
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "storage": store.backend(),
                "timestamp": Utc::now()
            }))
        }
    }
}
