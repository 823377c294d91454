use ethers::types::Log;
use tracing::{debug, warn};

use crate::consequences::ConsequenceContext;
use crate::events::{ColonyEvent, UnsavedChainEvent};
use crate::Repo;

use super::provider::{with_timeout, Provider};
use super::{DrainOutcome, Ingester, IngesterError};

impl<R: Repo, P: Provider> Ingester<R, P> {
    /// Records every queued log and applies its consequence.
    ///
    /// A failing log is logged and dropped so the rest of the queue still
    /// drains.
    pub async fn drain_events(&self) -> DrainOutcome {
        let Some(_drain_guard) = self.event_queue.try_start_drain() else {
            debug!("Event queue is already draining");
            return DrainOutcome::AlreadyDraining;
        };

        let mut drained = 0;

        while let Some(log) = self.event_queue.pop().await {
            if let Err(error) = self.process_log(&log).await {
                warn!(
                    transaction_hash = ?log.transaction_hash,
                    log_index = ?log.log_index,
                    "Skipping log: {error}"
                );
            }

            drained += 1;
        }

        DrainOutcome::Drained(drained)
    }

    async fn process_log(&self, log: &Log) -> Result<(), IngesterError> {
        let chain_event = UnsavedChainEvent::new(log)?;

        let upsert = with_timeout(
            self.call_timeout(),
            self.config.repo.upsert_chain_event(&chain_event),
        )
        .await?;

        // Only the call that recorded the event applies its consequence
        if !upsert.is_inserted() {
            debug!(
                transaction_hash = %chain_event.transaction_hash,
                log_index = chain_event.log_index,
                "Event already recorded"
            );
            return Ok(());
        }

        let event = ColonyEvent::decode(&log.topics, &log.data, &self.topic_registry)?;

        if event.is_unknown() {
            debug!(
                transaction_hash = %chain_event.transaction_hash,
                log_index = chain_event.log_index,
                "Recorded event with unknown topic: {event}"
            );
            return Ok(());
        }

        let context = ConsequenceContext {
            event: &event,
            chain_event: &chain_event,
            log,
            repo: &self.config.repo,
            provider: &*self.provider,
            contract: &self.contract,
            call_timeout: self.call_timeout(),
        };

        self.consequence_handler.handle_event(context).await
    }
}
