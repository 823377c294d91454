mod memory_repo;
mod postgres_repo;
