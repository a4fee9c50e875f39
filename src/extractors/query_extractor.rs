use super::validate_payload;
use crate::utils::api_response;
use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::Response,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string that has passed its `validator` rules.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                api_response::failure(
                    Some("Invalid query string"),
                    Some(rejection.body_text()),
                    Some(StatusCode::BAD_REQUEST),
                )
            })?;

        validate_payload(query).map(ValidatedQuery)
    }
}
