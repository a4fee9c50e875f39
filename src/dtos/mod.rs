pub mod resource_dto;
pub mod user_dto;

use std::collections::HashMap;
use validator::ValidationErrors;

/// First message per field, for the failure envelope.
pub fn validation_errors_to_map(errors: &ValidationErrors) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (field, errs) in errors.field_errors().iter() {
        if let Some(err) = errs.first() {
            let msg = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            map.insert(field.to_string(), msg);
        }
    }
    map
}
