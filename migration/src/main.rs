use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let conn = sea_orm_migration::sea_orm::Database::connect(&db_url)
        .await
        .expect("Failed to connect to database");

    // `up` (default), `down` rolls back the latest migration, `fresh` drops and re-applies all.
    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let result = match command.as_str() {
        "up" => Migrator::up(&conn, None).await,
        "down" => Migrator::down(&conn, Some(1)).await,
        "fresh" => Migrator::fresh(&conn).await,
        "status" => Migrator::status(&conn).await,
        other => {
            eprintln!("Unknown migration command `{other}` (expected up, down, fresh or status)");
            std::process::exit(2);
        }
    };

    result.expect("Migration failed");
    println!("Migration command `{command}` completed");
}
