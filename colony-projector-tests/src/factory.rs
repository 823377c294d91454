mod consequences;
mod logs;
mod providers;
mod repos;

pub use consequences::*;
pub use logs::*;
pub use providers::*;
pub use repos::*;

use std::sync::Arc;

use colony_projector::{Config, Ingester, Repo};

/// Fast rates so spawned loops tick within a test.
pub fn test_config<R: Repo>(repo: R) -> Config<R> {
    Config::new(repo, COLONY_NETWORK_ADDRESS)
        .with_block_processing_rate_ms(10)
        .with_event_processing_rate_ms(10)
        .with_block_polling_rate_ms(10)
        .with_call_timeout_ms(1_000)
}

pub fn test_ingester<R: Repo>(
    config: &Config<R>,
    provider: &TestProvider,
    spy: &SpyConsequenceHandler,
) -> Arc<Ingester<R, TestProvider>> {
    let ingester = Ingester::new(config, Arc::new(provider.clone()))
        .unwrap()
        .with_consequence_handler(spy.clone());

    Arc::new(ingester)
}
