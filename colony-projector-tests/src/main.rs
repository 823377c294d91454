use colony_projector::{PostgresRepo, Repo};
use colony_projector_tests::db;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prepares the Postgres test database: creates it and runs migrations.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    db::setup();

    let repo = PostgresRepo::new(&db::database_url()).await.unwrap();
    repo.migrate().await.unwrap();

    info!("Test database is ready");
}
