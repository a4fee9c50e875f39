use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

pub fn success<T: Serialize>(
    message: Option<&str>,
    data: Option<T>,
    status: Option<StatusCode>,
) -> Response {
    let body = SuccessResponse {
        success: true,
        message: message.unwrap_or("Action completed successfully").to_string(),
        data,
    };
    respond(status.unwrap_or(StatusCode::OK), body)
}

/// `errors` is dropped from the envelope if it cannot be serialized.
pub fn failure<T: Serialize>(
    message: Option<&str>,
    errors: Option<T>,
    status: Option<StatusCode>,
) -> Response {
    let body = FailureResponse {
        success: false,
        message: message.unwrap_or("An error occurred").to_string(),
        errors: errors.and_then(|e| serde_json::to_value(e).ok()),
    };
    respond(status.unwrap_or(StatusCode::BAD_REQUEST), body)
}

fn respond(status: StatusCode, body: impl Serialize) -> Response {
    (status, axum::Json(body)).into_response()
}
