use crud_scaffold::{config, run};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();
    config::logging::init_tracing();

    let db = match config::database::connect_with_retry().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(
                error = %e,
                "failed to connect to database; check networking, sslmode, host and credentials"
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = run(db).await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
