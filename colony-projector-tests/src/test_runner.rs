use std::env;
use std::future::Future;

use colony_projector::{PostgresRepo, Repo};
use dotenvy::dotenv;

use crate::db;

/// Runs `test_fn` against a migrated Postgres repo.
///
/// Tests share one database, so each should scope its writes to fresh
/// colony addresses and transaction hashes.
pub async fn run_test<TestFn, Fut>(test_fn: TestFn)
where
    TestFn: FnOnce(PostgresRepo) -> Fut,
    Fut: Future<Output = ()>,
{
    if should_setup_test_db() {
        db::setup();
    }

    let repo = new_repo().await;
    repo.migrate().await.unwrap();

    test_fn(repo).await;
}

pub async fn new_repo() -> PostgresRepo {
    PostgresRepo::new(&db::database_url()).await.unwrap()
}

fn should_setup_test_db() -> bool {
    dotenv().ok();

    env::var("SETUP_TEST_DB").is_ok()
}
