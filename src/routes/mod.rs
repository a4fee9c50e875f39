mod users;

use crate::{routes::users::users_router, utils::api_response};

use axum::{http::StatusCode, routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

pub fn app_router(database: DatabaseConnection) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .nest("/users", users_router(database))
        .layer(TraceLayer::new_for_http())
}

async fn hello_world() -> impl axum::response::IntoResponse {
    api_response::success(
        Some("Hello, world!"),
        Some("Resources are served under /users: POST /, GET /list, GET|PUT|DELETE /{id}."),
        Some(StatusCode::OK),
    )
}
