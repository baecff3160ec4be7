use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::SqlitePool;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod models;
mod routes;
mod types;

use config::AppConfig;

pub struct AppState {
    pub pool: SqlitePool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::init_pool(&config.database_url)?;
    match db::MIGRATOR.run(&pool).await {
        Ok(()) => info!("connected"),
        // Stay up in a degraded state; every store operation will fail until
        // the database becomes reachable.
        Err(e) => error!("did not connect: {e}"),
    }

    let app_state = Arc::new(AppState { pool });

    info!("Server is running on http://localhost:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(app_state.clone()))
            .service(routes::chat::routes())
            .service(routes::account::routes())
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    Ok(())
}
