use crate::utils::query_builder::FilterMode;
use once_cell::sync::Lazy;
use std::env;

pub mod database;
pub mod logging;

pub static APP_HOST: Lazy<String> =
    Lazy::new(|| env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()));

pub static APP_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("APP_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
});

// Array values in list filters match as a whole unless this is turned on.
pub static LIST_FILTER_MODE: Lazy<FilterMode> = Lazy::new(|| {
    let membership = env::var("LIST_FILTER_ARRAY_MEMBERSHIP")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    FilterMode::from_flag(membership)
});
