mod chain_reorg;
mod config;
pub mod consequences;
pub mod contracts;
mod diesel;
mod domains;
pub mod events;
mod hashes;
pub mod ingester;
mod repos;
mod tasks;
mod topics;

pub use chain_reorg::ReorgSafetyMargin;
pub use config::{Config, ConfigError};
pub use consequences::{ColonyConsequences, ConsequenceContext, ConsequenceHandler};
pub use contracts::{ColonyNetworkContract, ContractEvent, ContractEventTopic};
pub use domains::{Domain, UnsavedDomain, ROOT_DOMAIN_ID};
pub use events::{ChainEvent, ColonyEvent, UnsavedChainEvent};
pub use hashes::Hashes;
pub use ingester::{
    DecodeError, DrainOutcome, Ingester, IngesterError, Provider as IngesterProvider,
    ProviderError,
};
pub use repos::*;
pub use tasks::IngesterTask;
pub use topics::TopicRegistry;

#[cfg(feature = "postgres")]
pub type ColonyProjectorRepo = PostgresRepo;

#[cfg(feature = "postgres")]
pub type ColonyProjectorRepoPool = PostgresRepoPool;

#[cfg(feature = "postgres")]
pub type ColonyProjectorRepoConn<'a> = PostgresRepoConn<'a>;

pub use ethers::types::{Address, U256};

use std::sync::Arc;

/// Validates the config, prepares the repo, catches up on missed blocks and
/// keeps projecting ColonyNetwork activity until the returned task is stopped.
pub async fn start<R: Repo, P: IngesterProvider>(
    config: &Config<R>,
    provider: Arc<P>,
) -> Result<IngesterTask, IngesterError> {
    let ingester = Ingester::new(config, provider)?;

    Arc::new(ingester).start().await
}
