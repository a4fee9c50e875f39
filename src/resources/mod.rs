pub mod user_resource;
