use crate::controllers::resource_controller;
use crate::services::UserService;
use axum::Router;
use sea_orm::DatabaseConnection;

pub fn users_router(database: DatabaseConnection) -> Router {
    resource_controller::routes(UserService::new(database))
}
