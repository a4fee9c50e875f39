//! Handlers shared by every resource. Each one unpacks the request, calls
//! the service once and wraps the result in the response envelope; a
//! missing record becomes a 404.

use crate::dtos::resource_dto::ListQueryDto;
use crate::errors::AppError;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::services::ResourceService;
use crate::utils::api_response;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// `POST /`, `GET /list`, `GET|PUT|DELETE /{id}` for one resource.
pub fn routes<S: ResourceService>(service: S) -> Router {
    Router::new()
        .route("/", post(create::<S>))
        .route("/list", get(list::<S>))
        .route(
            "/{id}",
            get(show::<S>).put(update::<S>).delete(destroy::<S>),
        )
        .with_state(Arc::new(service))
}

pub async fn create<S: ResourceService>(
    State(service): State<Arc<S>>,
    ValidatedJson(payload): ValidatedJson<S::Create>,
) -> Response {
    match service.create(payload).await {
        Ok(created) => api_response::success(
            Some(&format!("{} created successfully!", S::NAME)),
            Some(created),
            Some(StatusCode::CREATED),
        ),
        Err(e) => e.into_response(),
    }
}

pub async fn list<S: ResourceService>(
    State(service): State<Arc<S>>,
    ValidatedQuery(query): ValidatedQuery<ListQueryDto>,
) -> Response {
    match service.list(query.into()).await {
        Ok(listed) => api_response::success(Some("success"), Some(listed), None),
        Err(e) => e.into_response(),
    }
}

pub async fn show<S: ResourceService>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    found::<S>(service.get(id).await, "success")
}

pub async fn update<S: ResourceService>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<S::Update>,
) -> Response {
    let message = format!("{} updated successfully!", S::NAME);
    found::<S>(service.update(id, payload).await, &message)
}

pub async fn destroy<S: ResourceService>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    let message = format!("{} deleted successfully!", S::NAME);
    found::<S>(service.delete(id).await, &message)
}

fn found<S: ResourceService>(result: Result<Option<S::View>, AppError>, message: &str) -> Response {
    match result {
        Ok(Some(view)) => api_response::success(Some(message), Some(view), None),
        Ok(None) => AppError::NotFound(S::NAME).into_response(),
        Err(e) => e.into_response(),
    }
}
