use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ethers::prelude::Middleware;
use ethers::providers::{Http, Provider as EthersProvider, ProviderError as EthersProviderError};
use ethers::types::{Filter, Log, Transaction, TxHash, U64};
use tokio::time::sleep;
use tracing::warn;

use crate::ConfigError;

use super::{DecodeError, IngesterError};

pub type ProviderError = EthersProviderError;

/// The subset of a JSON-RPC node the ingester talks to.
#[async_trait::async_trait]
pub trait Provider: Sync + Send + 'static {
    async fn get_block_number(&self) -> Result<U64, ProviderError>;
    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, ProviderError>;
    async fn get_transaction(
        &self,
        transaction_hash: TxHash,
    ) -> Result<Option<Transaction>, ProviderError>;
}

#[async_trait::async_trait]
impl Provider for EthersProvider<Http> {
    async fn get_block_number(&self) -> Result<U64, ProviderError> {
        Middleware::get_block_number(&self).await
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, ProviderError> {
        Middleware::get_logs(&self, filter).await
    }

    async fn get_transaction(
        &self,
        transaction_hash: TxHash,
    ) -> Result<Option<Transaction>, ProviderError> {
        Middleware::get_transaction(&self, transaction_hash).await
    }
}

pub fn get(json_rpc_url: &str) -> Result<Arc<EthersProvider<Http>>, ConfigError> {
    EthersProvider::<Http>::try_from(json_rpc_url)
        .map(Arc::new)
        .map_err(|_| ConfigError::InvalidJsonRpcUrl(json_rpc_url.to_string()))
}

/// Bounds a provider or repo call so a stalled node cannot hang a queue drain.
pub async fn with_timeout<T, E>(
    call_timeout: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, IngesterError>
where
    IngesterError: From<E>,
{
    match tokio::time::timeout(call_timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_elapsed) => Err(IngesterError::Timeout(call_timeout)),
    }
}

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Re-runs `call` until it succeeds or fails with a non-transient error,
/// doubling the pause after each transient failure.
pub async fn retry_with_backoff<T, F, Fut>(
    call_name: &str,
    initial_backoff: Duration,
    mut call: F,
) -> Result<T, IngesterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, IngesterError>>,
{
    let mut retries_so_far = 0;

    loop {
        match call().await {
            Err(error) if error.is_transient() => {
                warn!(retries_so_far, "{call_name} failed, retrying: {error}");

                backoff(initial_backoff, retries_so_far).await;
                retries_so_far += 1;
            }
            result => return result,
        }
    }
}

async fn backoff(initial_backoff: Duration, retries_so_far: u32) {
    let factor = 2u32.saturating_pow(retries_so_far);

    sleep(initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)).await;
}

pub async fn fetch_current_block_number(
    provider: &impl Provider,
    call_timeout: Duration,
) -> Result<u64, IngesterError> {
    let current_block_number = with_timeout(call_timeout, provider.get_block_number()).await?;

    Ok(current_block_number.as_u64())
}

pub async fn fetch_logs(
    provider: &impl Provider,
    filter: &Filter,
    call_timeout: Duration,
    log_warning_threshold: usize,
) -> Result<Vec<Log>, IngesterError> {
    let logs = with_timeout(call_timeout, provider.get_logs(filter)).await?;

    if exceeds_log_warning_threshold(&logs, log_warning_threshold) {
        warn!(
            count = logs.len(),
            from_block = ?filter.get_from_block(),
            to_block = ?filter.get_to_block(),
            "Fetched an unusually large number of logs"
        );
    }

    Ok(logs)
}

fn exceeds_log_warning_threshold(logs: &[Log], log_warning_threshold: usize) -> bool {
    logs.len() > log_warning_threshold
}

pub async fn fetch_transaction(
    provider: &impl Provider,
    transaction_hash: TxHash,
    call_timeout: Duration,
) -> Result<Transaction, IngesterError> {
    with_timeout(call_timeout, provider.get_transaction(transaction_hash))
        .await?
        .ok_or_else(|| DecodeError::MissingTransaction(transaction_hash).into())
}
