use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use ethers::types::{Log, H256};
use serde::Deserialize;

use crate::diesel::schema::colony_chain_events;
use crate::hashes::Hashes;
use crate::ingester::DecodeError;

/// A log observed on chain, ready to be recorded.
///
/// Identified by `(transaction_hash, log_index)`. Recording the same pair
/// twice is a no-op for storage.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = colony_chain_events)]
pub struct UnsavedChainEvent {
    pub transaction_hash: String,
    pub log_index: i64,
    pub address: String,
    pub topics: serde_json::Value,
    pub data: String,
    pub block_number: Option<i64>,
}

impl UnsavedChainEvent {
    pub fn new(log: &Log) -> Result<Self, DecodeError> {
        let transaction_hash =
            log.transaction_hash.ok_or(DecodeError::MissingLogField("transaction_hash"))?;
        let log_index = log.log_index.ok_or(DecodeError::MissingLogField("log_index"))?;

        Ok(Self {
            transaction_hash: Hashes::h256_to_string(&transaction_hash),
            log_index: log_index.low_u64() as i64,
            address: Hashes::h160_to_string(&log.address),
            topics: serde_json::Value::Array(
                log.topics
                    .iter()
                    .map(|topic| serde_json::Value::String(Hashes::h256_to_string(topic)))
                    .collect(),
            ),
            data: Hashes::bytes_to_string(&log.data),
            block_number: log.block_number.map(|block_number| block_number.as_u64() as i64),
        })
    }

    pub fn key(&self) -> (&str, i64) {
        (&self.transaction_hash, self.log_index)
    }
}

/// N/B: The order has to match ../diesel.rs to stop diesel from mixing up fields
#[derive(Debug, Clone, PartialEq, Queryable, Deserialize)]
pub struct ChainEvent {
    pub id: i64,
    pub transaction_hash: String,
    pub log_index: i64,
    pub address: String,
    pub topics: serde_json::Value,
    pub data: String,
    pub block_number: Option<i64>,
    pub inserted_at: DateTime<Utc>,
}

impl ChainEvent {
    pub fn get_block_number(&self) -> Option<u64> {
        self.block_number.map(|block_number| block_number as u64)
    }

    pub fn get_transaction_hash(&self) -> Result<H256, DecodeError> {
        self.transaction_hash.parse().map_err(|_| {
            DecodeError::Abi(format!("invalid transaction hash {}", self.transaction_hash))
        })
    }
}
