pub mod soft_delete;
pub mod users;

pub use soft_delete::{EntityState, SoftDelete};
