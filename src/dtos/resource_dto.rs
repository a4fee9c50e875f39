use crate::utils::resource_query::ResourceQuery;

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Query string accepted by every `GET /list` route.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQueryDto {
    #[validate(
        length(max = 2, message = "limit must be at most 2 digits"),
        custom(function = "validate_number_string")
    )]
    pub limit: Option<String>,

    #[validate(
        length(max = 2, message = "page must be at most 2 digits"),
        custom(function = "validate_number_string")
    )]
    pub page: Option<String>,

    #[validate(custom(function = "validate_alphanumeric"))]
    pub search: Option<String>,

    #[validate(custom(function = "validate_sort"))]
    pub sort: Option<String>,

    #[validate(length(min = 3, max = 50, message = "orderBy must be between 3 and 50 characters"))]
    pub order_by: Option<String>,

    pub filters: Option<String>,

    #[validate(length(min = 3, max = 50, message = "dateFrom must be between 3 and 50 characters"))]
    pub date_from: Option<String>,

    #[validate(length(min = 3, max = 50, message = "dateTo must be between 3 and 50 characters"))]
    pub date_to: Option<String>,
}

impl From<ListQueryDto> for ResourceQuery {
    fn from(dto: ListQueryDto) -> Self {
        Self {
            search: dto.search,
            sort: dto.sort,
            order_by: dto.order_by,
            page: dto.page,
            limit: dto.limit,
            filters: dto.filters,
            date_from: dto.date_from,
            date_to: dto.date_to,
        }
    }
}

fn validate_number_string(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new("number_string").with_message("must be a number".into()));
    }
    Ok(())
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::new("alphanumeric")
            .with_message("search may only contain letters and digits".into()));
    }
    Ok(())
}

fn validate_sort(value: &str) -> Result<(), ValidationError> {
    match value {
        "asc" | "desc" => Ok(()),
        _ => Err(ValidationError::new("sort").with_message("sort must be asc or desc".into())),
    }
}
