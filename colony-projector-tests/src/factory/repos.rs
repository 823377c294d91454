use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use colony_projector::{
    ChainEvent, Domain, MemoryRepo, Repo, RepoError, UnsavedChainEvent, UnsavedDomain, Upsert,
};

/// A [`MemoryRepo`] whose chain event writes take `delay` to complete and
/// which remembers how many of them were ever in flight at once.
#[derive(Clone, Debug)]
pub struct SlowRepo {
    inner: MemoryRepo,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl SlowRepo {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryRepo::new(),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Repo for SlowRepo {
    async fn migrate(&self) -> Result<(), RepoError> {
        self.inner.migrate().await
    }

    async fn upsert_chain_event(&self, event: &UnsavedChainEvent) -> Result<Upsert, RepoError> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        let upsert = self.inner.upsert_chain_event(event).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        upsert
    }

    async fn get_latest_chain_event(&self) -> Result<Option<ChainEvent>, RepoError> {
        self.inner.get_latest_chain_event().await
    }

    async fn get_all_chain_events(&self) -> Result<Vec<ChainEvent>, RepoError> {
        self.inner.get_all_chain_events().await
    }

    async fn upsert_domain(&self, domain: &UnsavedDomain) -> Result<Upsert, RepoError> {
        self.inner.upsert_domain(domain).await
    }

    async fn find_domain(
        &self,
        colony_address: &str,
        eth_domain_id: i64,
    ) -> Result<Option<Domain>, RepoError> {
        self.inner.find_domain(colony_address, eth_domain_id).await
    }

    async fn get_domains(&self, colony_address: &str) -> Result<Vec<Domain>, RepoError> {
        self.inner.get_domains(colony_address).await
    }
}
