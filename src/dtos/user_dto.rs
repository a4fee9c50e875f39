use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 20, message = "name must be between 3 and 20 characters"))]
    pub name: String,

    #[validate(
        email(message = "invalid email"),
        length(max = 50, message = "email must be at most 50 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub created_by: Option<String>,
}

/// Partial update: only the fields present are changed.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 3, max = 20, message = "name must be between 3 and 20 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "invalid email"),
        length(max = 50, message = "email must be at most 50 characters")
    )]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: Option<String>,

    pub last_updated_by: Option<String>,
}
