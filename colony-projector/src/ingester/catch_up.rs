use tracing::{debug, info};

use crate::Repo;

use super::provider::{self, with_timeout, Provider};
use super::{DecodeError, Ingester, IngesterError};

impl<R: Repo, P: Provider> Ingester<R, P> {
    /// Enqueues every block from the resume point through
    /// `current_block_number` and returns it.
    ///
    /// The resume point is the block of the most recently recorded event,
    /// pulled back by the reorg safety margin. With nothing recorded yet,
    /// ingestion starts at the head itself.
    pub async fn catch_up(&self, current_block_number: u64) -> Result<u64, IngesterError> {
        let call_timeout = self.call_timeout();
        let latest_event =
            with_timeout(call_timeout, self.config.repo.get_latest_chain_event()).await?;

        let from_block_number = match latest_event {
            None => current_block_number,
            Some(latest_event) => {
                let latest_block_number = match latest_event.get_block_number() {
                    Some(block_number) => block_number,
                    None => {
                        let transaction_hash = latest_event.get_transaction_hash()?;
                        let transaction = provider::fetch_transaction(
                            &*self.provider,
                            transaction_hash,
                            call_timeout,
                        )
                        .await?;

                        transaction
                            .block_number
                            .ok_or(DecodeError::PendingTransaction(transaction_hash))?
                            .as_u64()
                    }
                };

                self.config
                    .reorg_safety_margin
                    .deduct_from(latest_block_number, self.config.colony_network_start_block)
            }
        };

        info!(
            from_block_number,
            current_block_number, "Catching up on missed blocks"
        );

        self.block_queue.extend(from_block_number..=current_block_number).await;

        Ok(current_block_number)
    }

    /// Enqueues the blocks after `last_seen_block_number` up to and including
    /// `current_block_number`, returning the new last seen block.
    pub async fn enqueue_new_blocks(
        &self,
        last_seen_block_number: u64,
        current_block_number: u64,
    ) -> u64 {
        if current_block_number <= last_seen_block_number {
            return last_seen_block_number;
        }

        debug!(
            from_block_number = last_seen_block_number + 1,
            current_block_number, "Enqueuing new blocks"
        );

        self.block_queue
            .extend(last_seen_block_number + 1..=current_block_number)
            .await;

        current_block_number
    }
}
