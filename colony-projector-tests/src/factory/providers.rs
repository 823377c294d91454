use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colony_projector::{IngesterProvider, ProviderError};
use ethers::types::{Filter, Log, Transaction, TxHash, ValueOrArray, U64};

/// Scriptable chain: serves canned logs and transactions, filtered the way a
/// node would filter them.
#[derive(Clone, Debug, Default)]
pub struct TestProvider {
    state: Arc<Mutex<TestProviderState>>,
}

#[derive(Debug, Default)]
struct TestProviderState {
    current_block_number: u64,
    logs: Vec<Log>,
    transactions: HashMap<TxHash, Transaction>,
    failing_block_numbers: HashSet<u64>,
    requested_filters: Vec<Filter>,
    delay: Option<Duration>,
    head_increment: u64,
}

impl TestProvider {
    pub fn new(current_block_number: u64) -> Self {
        let provider = Self::default();
        provider.set_current_block_number(current_block_number);

        provider
    }

    pub fn with_logs(self, logs: impl IntoIterator<Item = Log>) -> Self {
        self.state.lock().unwrap().logs.extend(logs);

        self
    }

    pub fn with_transaction(self, transaction: Transaction) -> Self {
        self.add_transaction(transaction);

        self
    }

    /// Moves the chain head forward by `head_increment` after every read.
    pub fn with_head_increment(self, head_increment: u64) -> Self {
        self.state.lock().unwrap().head_increment = head_increment;

        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().delay = Some(delay);

        self
    }

    pub fn add_log(&self, log: Log) {
        self.state.lock().unwrap().logs.push(log);
    }

    pub fn add_transaction(&self, transaction: Transaction) {
        self.state.lock().unwrap().transactions.insert(transaction.hash, transaction);
    }

    pub fn set_current_block_number(&self, current_block_number: u64) {
        self.state.lock().unwrap().current_block_number = current_block_number;
    }

    pub fn fail_block(&self, block_number: u64) {
        self.state.lock().unwrap().failing_block_numbers.insert(block_number);
    }

    pub fn restore_block(&self, block_number: u64) {
        self.state.lock().unwrap().failing_block_numbers.remove(&block_number);
    }

    pub fn requested_filters(&self) -> Vec<Filter> {
        self.state.lock().unwrap().requested_filters.clone()
    }

    async fn maybe_delay(&self) {
        let delay = self.state.lock().unwrap().delay;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl IngesterProvider for TestProvider {
    async fn get_block_number(&self) -> Result<U64, ProviderError> {
        self.maybe_delay().await;

        let mut state = self.state.lock().unwrap();
        let current_block_number = state.current_block_number;
        state.current_block_number += state.head_increment;

        Ok(U64::from(current_block_number))
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, ProviderError> {
        self.maybe_delay().await;

        let mut state = self.state.lock().unwrap();
        state.requested_filters.push(filter.clone());

        let (from_block_number, to_block_number) = get_block_range(filter);
        if let Some(failing_block_number) = state
            .failing_block_numbers
            .iter()
            .find(|n| (from_block_number..=to_block_number).contains(*n))
        {
            return Err(ProviderError::CustomError(format!(
                "block {failing_block_number} is unavailable"
            )));
        }

        Ok(state.logs.iter().filter(|log| matches(filter, log)).cloned().collect())
    }

    async fn get_transaction(
        &self,
        transaction_hash: TxHash,
    ) -> Result<Option<Transaction>, ProviderError> {
        self.maybe_delay().await;

        Ok(self.state.lock().unwrap().transactions.get(&transaction_hash).cloned())
    }
}

fn get_block_range(filter: &Filter) -> (u64, u64) {
    (
        filter.get_from_block().map(|n| n.as_u64()).unwrap_or(0),
        filter.get_to_block().map(|n| n.as_u64()).unwrap_or(u64::MAX),
    )
}

fn matches(filter: &Filter, log: &Log) -> bool {
    let (from_block_number, to_block_number) = get_block_range(filter);
    let block_number = log.block_number.map(|n| n.as_u64()).unwrap_or_default();

    let address_matches = match &filter.address {
        Some(ValueOrArray::Value(address)) => *address == log.address,
        Some(ValueOrArray::Array(addresses)) => addresses.contains(&log.address),
        None => true,
    };

    let topic_matches = match &filter.topics[0] {
        Some(ValueOrArray::Value(Some(topic))) => log.topics.first() == Some(topic),
        _ => true,
    };

    (from_block_number..=to_block_number).contains(&block_number)
        && address_matches
        && topic_matches
}
