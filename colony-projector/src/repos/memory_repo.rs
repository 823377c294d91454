use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domains::{Domain, UnsavedDomain};
use crate::events::{ChainEvent, UnsavedChainEvent};

use super::repo::{Repo, RepoError, Upsert};

/// In-process projection store with the same uniqueness and parent
/// constraints as the Postgres schema.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepo {
    store: Arc<Mutex<MemoryStore>>,
}

#[derive(Debug, Default)]
struct MemoryStore {
    chain_events: Vec<ChainEvent>,
    domains: Vec<Domain>,
    last_id: i64,
}

impl MemoryStore {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn find_domain(&self, colony_address: &str, eth_domain_id: i64) -> Option<&Domain> {
        self.domains
            .iter()
            .find(|d| d.colony_address == colony_address && d.eth_domain_id == eth_domain_id)
    }
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Repo for MemoryRepo {
    async fn migrate(&self) -> Result<(), RepoError> {
        Ok(())
    }

    async fn upsert_chain_event(&self, event: &UnsavedChainEvent) -> Result<Upsert, RepoError> {
        let mut store = self.store.lock().await;

        let already_existed = store
            .chain_events
            .iter()
            .any(|e| (e.transaction_hash.as_str(), e.log_index) == event.key());

        if already_existed {
            return Ok(Upsert::AlreadyExisted);
        }

        let id = store.next_id();
        store.chain_events.push(ChainEvent {
            id,
            transaction_hash: event.transaction_hash.clone(),
            log_index: event.log_index,
            address: event.address.clone(),
            topics: event.topics.clone(),
            data: event.data.clone(),
            block_number: event.block_number,
            inserted_at: Utc::now(),
        });

        Ok(Upsert::Inserted)
    }

    async fn get_latest_chain_event(&self) -> Result<Option<ChainEvent>, RepoError> {
        let store = self.store.lock().await;

        Ok(store.chain_events.iter().max_by_key(|e| e.id).cloned())
    }

    async fn get_all_chain_events(&self) -> Result<Vec<ChainEvent>, RepoError> {
        let store = self.store.lock().await;

        Ok(store.chain_events.clone())
    }

    async fn upsert_domain(&self, domain: &UnsavedDomain) -> Result<Upsert, RepoError> {
        let mut store = self.store.lock().await;

        if store.find_domain(&domain.colony_address, domain.eth_domain_id).is_some() {
            return Ok(Upsert::AlreadyExisted);
        }

        if let Some(eth_parent_domain_id) = domain.eth_parent_domain_id {
            if store.find_domain(&domain.colony_address, eth_parent_domain_id).is_none() {
                return Err(RepoError::Validation(format!(
                    "parent domain {} does not exist in colony {}",
                    eth_parent_domain_id, domain.colony_address
                )));
            }
        }

        let id = store.next_id();
        store.domains.push(Domain {
            id,
            colony_address: domain.colony_address.clone(),
            eth_domain_id: domain.eth_domain_id,
            eth_parent_domain_id: domain.eth_parent_domain_id,
            name: domain.name.clone(),
            inserted_at: Utc::now(),
        });

        Ok(Upsert::Inserted)
    }

    async fn find_domain(
        &self,
        colony_address: &str,
        eth_domain_id: i64,
    ) -> Result<Option<Domain>, RepoError> {
        let store = self.store.lock().await;

        Ok(store.find_domain(&colony_address.to_lowercase(), eth_domain_id).cloned())
    }

    async fn get_domains(&self, colony_address: &str) -> Result<Vec<Domain>, RepoError> {
        let store = self.store.lock().await;
        let colony_address = colony_address.to_lowercase();

        let mut domains: Vec<_> =
            store.domains.iter().filter(|d| d.colony_address == colony_address).cloned().collect();
        domains.sort_by_key(|d| d.eth_domain_id);

        Ok(domains)
    }
}
