mod domain_added;

use std::time::Duration;

use ethers::types::Log;
use tracing::debug;

use crate::contracts::ColonyNetworkContract;
use crate::events::{ColonyEvent, UnsavedChainEvent};
use crate::ingester::{IngesterError, Provider};
use crate::Repo;

/// Applies the projection-level effect of a newly recorded event.
///
/// Called at most once per event: only after the event's own record was
/// inserted by the same caller.
#[async_trait::async_trait]
pub trait ConsequenceHandler<R: Repo, P: Provider>: Send + Sync {
    async fn handle_event<'a>(
        &self,
        context: ConsequenceContext<'a, R, P>,
    ) -> Result<(), IngesterError>;
}

pub struct ConsequenceContext<'a, R: Repo, P: Provider> {
    pub event: &'a ColonyEvent,
    pub chain_event: &'a UnsavedChainEvent,
    pub log: &'a Log,
    pub repo: &'a R,
    pub provider: &'a P,
    pub contract: &'a ColonyNetworkContract,
    pub call_timeout: Duration,
}

/// Projects domains. Every other event kind is recorded without consequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonyConsequences;

#[async_trait::async_trait]
impl<R: Repo, P: Provider> ConsequenceHandler<R, P> for ColonyConsequences {
    async fn handle_event<'a>(
        &self,
        context: ConsequenceContext<'a, R, P>,
    ) -> Result<(), IngesterError> {
        match context.event {
            ColonyEvent::DomainAdded { domain_id } => {
                domain_added::apply(&context, *domain_id).await
            }
            event => {
                debug!(address = %context.chain_event.address, "No consequence for {event}");
                Ok(())
            }
        }
    }
}
