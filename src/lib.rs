pub mod config;
pub mod controllers;
pub mod database;
pub mod dtos;
pub mod errors;
pub mod extractors;
pub mod repositories;
pub mod resources;
pub mod routes;
pub mod services;
pub mod utils;

use sea_orm::DatabaseConnection;

pub async fn run(db: DatabaseConnection) -> std::io::Result<()> {
    let app = routes::app_router(db);

    let addr = format!("{}:{}", *config::APP_HOST, *config::APP_PORT);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await
}
