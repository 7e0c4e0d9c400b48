use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use tasklists::auth::AuthMiddleware;
use tasklists::config::Config;
use tasklists::routes::{self, health};
use tasklists::store::{MemoryStore, PostgresStore, TodoStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let store: Arc<dyn TodoStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url, config.database_max_connections)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let store = web::Data::from(store);
    let jwt = web::Data::new(config.jwt.clone());
    let password = web::Data::new(config.password);

    log::info!(
        "starting server at {} ({} storage)",
        config.server_url(),
        store.backend()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(jwt.clone())
            .app_data(password.clone())
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
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
