use crate::database::users::Model as UserModel;
use serde::{Deserialize, Serialize};

/// Outward view of a user. The password hash and the deleted flag never
/// leave the service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_by: Option<String>,
    pub last_updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&UserModel> for UserResource {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_by: user.created_by.clone(),
            last_updated_by: user.last_updated_by.clone(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
