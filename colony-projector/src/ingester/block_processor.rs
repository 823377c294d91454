use ethers::types::Log;
use tracing::{debug, warn};

use crate::Repo;

use super::provider::{self, Provider};
use super::{DrainOutcome, Ingester, IngesterError};

impl<R: Repo, P: Provider> Ingester<R, P> {
    /// Turns every queued block into queued logs from known colonies.
    ///
    /// A block whose logs cannot be fetched is skipped, not retried.
    pub async fn drain_blocks(&self) -> DrainOutcome {
        let Some(_drain_guard) = self.block_queue.try_start_drain() else {
            debug!("Block queue is already draining");
            return DrainOutcome::AlreadyDraining;
        };

        let mut drained = 0;

        while let Some(block_number) = self.block_queue.pop().await {
            match self.fetch_colony_logs(block_number).await {
                Ok(logs) => {
                    debug!(block_number, count = logs.len(), "Enqueuing colony logs");
                    self.event_queue.extend(logs).await;
                }
                Err(error) => warn!(block_number, "Skipping block: {error}"),
            }

            drained += 1;
        }

        DrainOutcome::Drained(drained)
    }

    async fn fetch_colony_logs(&self, block_number: u64) -> Result<Vec<Log>, IngesterError> {
        let colony_addresses = self.colonies.addresses().await;
        if colony_addresses.is_empty() {
            return Ok(vec![]);
        }

        provider::fetch_logs(
            &*self.provider,
            &self.contract.block_filter(block_number, colony_addresses),
            self.call_timeout(),
            self.config.log_warning_threshold,
        )
        .await
    }
}
