use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use storefront_api::configure_routes;
use storefront_api::services::{AuthGuard, AuthService, PasswordHasher, TokenService};
use storefront_config::AppConfig;
use storefront_database::{CatalogRepository, Database, PgUserStore};
use storefront_middleware::RequestLogging;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing::info!("connecting to database");
    let database = Database::connect(&config.database_url, config.database_max_connections).await?;
    database.run_migrations().await?;

    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_secs);
    let passwords = PasswordHasher::new(config.bcrypt_cost);
    let user_store = PgUserStore::new(database.pool().clone());

    let auth_service = web::Data::new(AuthService::new(
        Arc::new(user_store.clone()),
        tokens.clone(),
        passwords,
    ));
    let user_store = web::Data::new(user_store);
    let catalog = web::Data::new(CatalogRepository::new(database.pool().clone()));
    let database = web::Data::new(database);
    let guard = AuthGuard::new(tokens);

    let port = config.port;
    tracing::info!(port, "starting storefront API");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(auth_service.clone())
            .app_data(user_store.clone())
            .app_data(catalog.clone())
            .app_data(database.clone())
            .wrap(cors)
            .wrap(RequestLogging::default())
            .route("/health", web::get().to(health_check))
            .configure(|cfg| configure_routes(cfg, guard.clone()))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}

async fn health_check(
    database: web::Data<Database>,
) -> actix_web::Result<web::Json<serde_json::Value>> {
    let db_status = match storefront_database::sqlx::query("SELECT 1")
        .execute(database.pool())
        .await
    {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("database health check failed: {e}");
            "disconnected"
        }
    };

    Ok(web::Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-api",
        "database": db_status,
        "timestamp": chrono::Utc::now(),
    })))
}
