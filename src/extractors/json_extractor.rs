use super::validate_payload;
use crate::utils::api_response;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `validator` rules.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_body)?;

        validate_payload(payload).map(ValidatedJson)
    }
}

fn reject_body(rejection: JsonRejection) -> Response {
    let reason = match rejection {
        JsonRejection::JsonDataError(err) => format!("Kindly pass a valid JSON data: {err}"),
        JsonRejection::JsonSyntaxError(_) => "Kindly pass a valid JSON body".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        other => other.body_text(),
    };
    tracing::debug!(%reason, "rejected request body");

    api_response::failure(
        Some("Invalid request"),
        Some(reason),
        Some(StatusCode::BAD_REQUEST),
    )
}
