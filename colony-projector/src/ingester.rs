mod block_processor;
mod catch_up;
mod colonies;
mod error;
mod log_processor;
pub mod provider;
mod queues;

pub use colonies::ColonyRegistry;
pub use error::{DecodeError, IngesterError};
pub use provider::{Provider, ProviderError};
pub use queues::{DrainGuard, DrainOutcome, WorkQueue};

use std::sync::Arc;
use std::time::Duration;

use ethers::types::Log;
use tokio::time::interval;
use tracing::{info, warn};

use crate::consequences::{ColonyConsequences, ConsequenceHandler};
use crate::contracts::ColonyNetworkContract;
use crate::tasks::IngesterTask;
use crate::topics::TopicRegistry;
use crate::{Config, Repo};

use self::provider::retry_with_backoff;

/// Projects ColonyNetwork activity into the repo.
///
/// Blocks flow through `block_queue`, where each block's logs are fetched
/// and narrowed to known colonies, then through `event_queue`, where each
/// log is recorded once and its consequence is applied. Both queues are
/// drained by at most one caller at a time.
pub struct Ingester<R: Repo, P: Provider> {
    config: Config<R>,
    provider: Arc<P>,
    contract: ColonyNetworkContract,
    topic_registry: TopicRegistry,
    colonies: ColonyRegistry,
    block_queue: WorkQueue<u64>,
    event_queue: WorkQueue<Log>,
    consequence_handler: Arc<dyn ConsequenceHandler<R, P>>,
}

impl<R: Repo, P: Provider> Ingester<R, P> {
    pub fn new(config: &Config<R>, provider: Arc<P>) -> Result<Self, IngesterError> {
        config.validate()?;

        let contract = ColonyNetworkContract::new(config.get_colony_network_address()?);
        let topic_registry = TopicRegistry::new(&contract);

        Ok(Self {
            config: config.clone(),
            provider,
            contract,
            topic_registry,
            colonies: ColonyRegistry::new(config.colony_network_start_block),
            block_queue: WorkQueue::new(),
            event_queue: WorkQueue::new(),
            consequence_handler: Arc::new(ColonyConsequences),
        })
    }

    pub fn with_consequence_handler(
        mut self,
        consequence_handler: impl ConsequenceHandler<R, P> + 'static,
    ) -> Self {
        self.consequence_handler = Arc::new(consequence_handler);

        self
    }

    pub fn repo(&self) -> &R {
        &self.config.repo
    }

    pub fn colonies(&self) -> &ColonyRegistry {
        &self.colonies
    }

    pub fn block_queue(&self) -> &WorkQueue<u64> {
        &self.block_queue
    }

    pub fn event_queue(&self) -> &WorkQueue<Log> {
        &self.event_queue
    }

    pub async fn enqueue_block(&self, block_number: u64) {
        self.block_queue.push(block_number).await;
    }

    pub async fn enqueue_log(&self, log: Log) {
        self.event_queue.push(log).await;
    }

    fn call_timeout(&self) -> Duration {
        self.config.get_call_timeout()
    }

    /// Migrates the repo, seeds the colony registry, enqueues the catch-up
    /// range and spawns the periodic drains and the chain head watcher.
    ///
    /// Transient provider and repo failures are retried with exponential
    /// backoff. Colonies are registered up to the same head the catch-up
    /// range ends at.
    pub async fn start(self: Arc<Self>) -> Result<IngesterTask, IngesterError> {
        self.config.repo.migrate().await?;

        let retry_backoff = self.config.get_retry_backoff();

        let current_block_number = retry_with_backoff("Fetching chain head", retry_backoff, || {
            provider::fetch_current_block_number(&*self.provider, self.call_timeout())
        })
        .await?;

        let discovered = retry_with_backoff("Syncing colonies", retry_backoff, || {
            self.sync_colonies(current_block_number)
        })
        .await?;
        info!(discovered, current_block_number, "Seeded colony registry");

        let last_seen_block_number = retry_with_backoff("Catching up", retry_backoff, || {
            self.catch_up(current_block_number)
        })
        .await?;

        Ok(self.spawn(last_seen_block_number).await)
    }

    pub async fn spawn(self: Arc<Self>, last_seen_block_number: u64) -> IngesterTask {
        let task = IngesterTask::new();

        let ingester = self.clone();
        task.add_subtask(tokio::spawn(async move {
            let mut interval = interval(Duration::from_millis(
                ingester.config.event_processing_rate_ms,
            ));

            loop {
                interval.tick().await;
                ingester.drain_events().await;
            }
        }))
        .await;

        let ingester = self.clone();
        task.add_subtask(tokio::spawn(async move {
            let mut interval = interval(Duration::from_millis(
                ingester.config.block_processing_rate_ms,
            ));

            loop {
                interval.tick().await;
                ingester.drain_blocks().await;
            }
        }))
        .await;

        let ingester = self;
        task.add_subtask(tokio::spawn(async move {
            let mut interval =
                interval(Duration::from_millis(ingester.config.block_polling_rate_ms));
            let mut last_seen_block_number = last_seen_block_number;

            loop {
                interval.tick().await;

                match ingester.watch_chain_head(last_seen_block_number).await {
                    Ok(current_block_number) => last_seen_block_number = current_block_number,
                    Err(error) => warn!(last_seen_block_number, "Chain head watch failed: {error}"),
                }
            }
        }))
        .await;

        task
    }

    /// Registers colonies created since the last scan, then enqueues every
    /// block after `last_seen_block_number` and returns the new head.
    ///
    /// No block is enqueued until the registry covers it, so a failed colony
    /// sync leaves the head where it was for the next watch to retry.
    pub async fn watch_chain_head(
        &self,
        last_seen_block_number: u64,
    ) -> Result<u64, IngesterError> {
        let current_block_number =
            provider::fetch_current_block_number(&*self.provider, self.call_timeout()).await?;

        self.sync_colonies(current_block_number).await?;

        Ok(self.enqueue_new_blocks(last_seen_block_number, current_block_number).await)
    }
}
