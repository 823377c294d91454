use derive_more::Display;
use std::fmt::Debug;

use crate::domains::{Domain, UnsavedDomain};
use crate::events::{ChainEvent, UnsavedChainEvent};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("repo is not connected")]
    NotConnected,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("repo error: {0}")]
    Unknown(String),
}

/// Outcome of an insert-if-absent write, derived from the write itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Upsert {
    Inserted,
    AlreadyExisted,
}

impl Upsert {
    pub fn is_inserted(&self) -> bool {
        *self == Upsert::Inserted
    }
}

/// The projection store.
///
/// Every write is an insert-if-absent keyed on the entity's natural key, so
/// concurrent or repeated callers never create duplicates. The returned
/// [`Upsert`] is the only reliable signal of whether a write created anything.
#[async_trait::async_trait]
pub trait Repo: Sync + Send + Clone + Debug + 'static {
    async fn migrate(&self) -> Result<(), RepoError>;

    async fn upsert_chain_event(&self, event: &UnsavedChainEvent) -> Result<Upsert, RepoError>;
    /// Most recently recorded event by insertion order.
    async fn get_latest_chain_event(&self) -> Result<Option<ChainEvent>, RepoError>;
    async fn get_all_chain_events(&self) -> Result<Vec<ChainEvent>, RepoError>;

    /// Fails with [`RepoError::Validation`] when the parent domain does not exist.
    async fn upsert_domain(&self, domain: &UnsavedDomain) -> Result<Upsert, RepoError>;
    async fn find_domain(
        &self,
        colony_address: &str,
        eth_domain_id: i64,
    ) -> Result<Option<Domain>, RepoError>;
    async fn get_domains(&self, colony_address: &str) -> Result<Vec<Domain>, RepoError>;
}

pub trait RepoMigrations {
    fn create_chain_events_migration() -> &'static [&'static str];
    fn create_domains_migration() -> &'static [&'static str];

    fn get_internal_migrations() -> Vec<&'static str> {
        [
            Self::create_chain_events_migration(),
            Self::create_domains_migration(),
        ]
        .concat()
    }
}

pub struct SQLikeMigrations;

impl SQLikeMigrations {
    pub fn create_chain_events() -> &'static [&'static str] {
        &[
            "CREATE TABLE IF NOT EXISTS colony_chain_events (
                id BIGSERIAL PRIMARY KEY,
                transaction_hash VARCHAR NOT NULL,
                log_index BIGINT NOT NULL,
                address VARCHAR NOT NULL,
                topics JSON NOT NULL,
                data TEXT NOT NULL,
                block_number BIGINT,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            "CREATE UNIQUE INDEX IF NOT EXISTS colony_chain_events_transaction_hash_log_index
            ON colony_chain_events(transaction_hash, log_index)",
        ]
    }

    pub fn create_domains() -> &'static [&'static str] {
        &["CREATE TABLE IF NOT EXISTS colony_domains (
                id BIGSERIAL PRIMARY KEY,
                colony_address VARCHAR NOT NULL,
                eth_domain_id BIGINT NOT NULL,
                eth_parent_domain_id BIGINT,
                name VARCHAR NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT colony_domains_colony_address_eth_domain_id
                    UNIQUE (colony_address, eth_domain_id),
                CONSTRAINT colony_domains_parent
                    FOREIGN KEY (colony_address, eth_parent_domain_id)
                    REFERENCES colony_domains (colony_address, eth_domain_id)
            )"]
    }
}
