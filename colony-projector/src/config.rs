use std::str::FromStr;
use std::time::Duration;

use ethers::types::Address;

use crate::{ReorgSafetyMargin, Repo};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid ColonyNetwork address: {0}")]
    InvalidColonyNetworkAddress(String),
    #[error("invalid JSON-RPC url: {0}")]
    InvalidJsonRpcUrl(String),
    #[error("blocks_per_batch must be greater than zero")]
    ZeroBlocksPerBatch,
    #[error("{0} must be greater than zero")]
    ZeroRate(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config<R: Repo> {
    pub repo: R,
    pub colony_network_address: String,
    pub colony_network_start_block: u64,
    pub reorg_safety_margin: ReorgSafetyMargin,
    pub blocks_per_batch: u64,
    pub block_processing_rate_ms: u64,
    pub event_processing_rate_ms: u64,
    pub block_polling_rate_ms: u64,
    pub log_warning_threshold: usize,
    pub call_timeout_ms: u64,
    pub retry_backoff_ms: u64,
}

impl<R: Repo> Config<R> {
    pub fn new(repo: R, colony_network_address: &str) -> Self {
        Self {
            repo,
            colony_network_address: colony_network_address.to_string(),
            colony_network_start_block: 0,
            reorg_safety_margin: ReorgSafetyMargin::default(),
            blocks_per_batch: 8_000,
            block_processing_rate_ms: 15_000,
            event_processing_rate_ms: 1_000,
            block_polling_rate_ms: 4_000,
            log_warning_threshold: 500,
            call_timeout_ms: 30_000,
            retry_backoff_ms: 1_000,
        }
    }

    pub fn with_colony_network_start_block(mut self, colony_network_start_block: u64) -> Self {
        self.colony_network_start_block = colony_network_start_block;

        self
    }

    pub fn with_reorg_safety_margin(mut self, reorg_safety_margin: u64) -> Self {
        self.reorg_safety_margin = ReorgSafetyMargin::new(reorg_safety_margin);

        self
    }

    pub fn with_blocks_per_batch(mut self, blocks_per_batch: u64) -> Self {
        self.blocks_per_batch = blocks_per_batch;

        self
    }

    pub fn with_block_processing_rate_ms(mut self, block_processing_rate_ms: u64) -> Self {
        self.block_processing_rate_ms = block_processing_rate_ms;

        self
    }

    pub fn with_event_processing_rate_ms(mut self, event_processing_rate_ms: u64) -> Self {
        self.event_processing_rate_ms = event_processing_rate_ms;

        self
    }

    pub fn with_block_polling_rate_ms(mut self, block_polling_rate_ms: u64) -> Self {
        self.block_polling_rate_ms = block_polling_rate_ms;

        self
    }

    pub fn with_log_warning_threshold(mut self, log_warning_threshold: usize) -> Self {
        self.log_warning_threshold = log_warning_threshold;

        self
    }

    pub fn with_call_timeout_ms(mut self, call_timeout_ms: u64) -> Self {
        self.call_timeout_ms = call_timeout_ms;

        self
    }

    /// First pause before retrying a failed startup call; doubles per retry.
    pub fn with_retry_backoff_ms(mut self, retry_backoff_ms: u64) -> Self {
        self.retry_backoff_ms = retry_backoff_ms;

        self
    }

    pub fn get_colony_network_address(&self) -> Result<Address, ConfigError> {
        Address::from_str(&self.colony_network_address).map_err(|_| {
            ConfigError::InvalidColonyNetworkAddress(self.colony_network_address.clone())
        })
    }

    pub fn get_call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn get_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.get_colony_network_address()?;

        if self.blocks_per_batch == 0 {
            return Err(ConfigError::ZeroBlocksPerBatch);
        }

        [
            ("block_processing_rate_ms", self.block_processing_rate_ms),
            ("event_processing_rate_ms", self.event_processing_rate_ms),
            ("block_polling_rate_ms", self.block_polling_rate_ms),
            ("call_timeout_ms", self.call_timeout_ms),
            ("retry_backoff_ms", self.retry_backoff_ms),
        ]
        .into_iter()
        .find(|(_, rate)| *rate == 0)
        .map_or(Ok(()), |(name, _)| Err(ConfigError::ZeroRate(name)))
    }
}
