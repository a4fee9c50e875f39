#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use crud_scaffold::database::users;
use crud_scaffold::repositories::UserRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};

/// Fresh in-memory database with the users table in place. A single pooled
/// connection keeps every query on the same memory store.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let statement = schema.create_table_from_entity(users::Entity);
    db.execute(db.get_database_backend().build(&statement))
        .await
        .expect("create users table");
    db
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

pub fn new_user(name: &str, email: &str, created: DateTime<Utc>) -> users::ActiveModel {
    users::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password: Set("hashed".to_string()),
        created_at: Set(created),
        updated_at: Set(created),
        ..Default::default()
    }
}

/// Inserts users named after `names`, created (and last updated) on
/// consecutive days starting at January 1st.
pub async fn seed_users(
    db: &DatabaseConnection,
    repo: &UserRepository,
    names: &[&str],
) -> Vec<users::Model> {
    let mut created = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let data = new_user(name, &format!("{name}@example.com"), day(i as u32 + 1));
        created.push(repo.create(db, data).await.expect("seed user"));
    }
    created
}

pub fn names(items: &[users::Model]) -> Vec<&str> {
    items.iter().map(|u| u.name.as_str()).collect()
}
