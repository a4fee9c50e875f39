pub mod base_service;
pub mod user_service;

pub use base_service::{BaseService, ResourceMapping, ResourceService};
pub use user_service::UserService;
