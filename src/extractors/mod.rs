pub mod json_extractor;
pub mod query_extractor;

pub use json_extractor::ValidatedJson;
pub use query_extractor::ValidatedQuery;

use crate::dtos::validation_errors_to_map;
use crate::utils::api_response;
use axum::{http::StatusCode, response::Response};
use validator::Validate;

/// Runs the payload's rules; failures become a 422 with one message per
/// field.
fn validate_payload<T: Validate>(payload: T) -> Result<T, Response> {
    match payload.validate() {
        Ok(()) => Ok(payload),
        Err(errors) => Err(api_response::failure(
            Some("Validation failed"),
            Some(validation_errors_to_map(&errors)),
            Some(StatusCode::UNPROCESSABLE_ENTITY),
        )),
    }
}
