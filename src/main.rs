mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::state::AppState;
use crate::utils::uploads::PUBLIC_PREFIX;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting Meeting Service...");
    log::info!("📊 Database: {}", config.database_name);

    if config.uses_default_secret() {
        log::warn!("⚠️  JWT_SECRET not set, using the built-in development secret");
    }

    let db = database::MongoDB::connect(&config).await.map_err(|e| {
        log::error!("❌ Failed to connect to MongoDB: {}", e);
        io::Error::other(e.to_string())
    })?;

    log::info!("✅ MongoDB connected successfully");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let state = web::Data::new(AppState::new(db, &config));
    let upload_dir = config.upload_dir.clone();
    let cors_origin = config.cors_origin.clone();

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("🖼️  Uploads served from {} at {}", upload_dir.display(), PUBLIC_PREFIX);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ORIGIN,
            ])
            .expose_headers(vec![header::CONTENT_LENGTH, header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()),
            )
            .service(actix_files::Files::new(PUBLIC_PREFIX, &upload_dir))
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
