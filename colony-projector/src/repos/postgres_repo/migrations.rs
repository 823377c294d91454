use crate::{PostgresRepo, RepoMigrations, SQLikeMigrations};

impl RepoMigrations for PostgresRepo {
    fn create_chain_events_migration() -> &'static [&'static str] {
        SQLikeMigrations::create_chain_events()
    }

    fn create_domains_migration() -> &'static [&'static str] {
        SQLikeMigrations::create_domains()
    }
}
