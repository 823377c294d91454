mod memory_repo;
#[cfg(feature = "postgres")]
mod postgres_repo;
mod repo;

pub use memory_repo::MemoryRepo;
#[cfg(feature = "postgres")]
pub use postgres_repo::{Conn as PostgresRepoConn, Pool as PostgresRepoPool, PostgresRepo};
pub use repo::{Repo, RepoError, RepoMigrations, SQLikeMigrations, Upsert};
