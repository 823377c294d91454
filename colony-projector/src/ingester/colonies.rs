use std::cmp::min;
use std::collections::HashSet;

use ethers::types::Address;
use futures_util::future::try_join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domains::UnsavedDomain;
use crate::events::ColonyEvent;
use crate::hashes::Hashes;
use crate::Repo;

use super::provider::{self, with_timeout, Provider};
use super::{Ingester, IngesterError};

const CONCURRENT_BATCHES: usize = 4;

/// Addresses of every colony created by the ColonyNetwork so far.
#[derive(Debug)]
pub struct ColonyRegistry {
    addresses: RwLock<HashSet<Address>>,
    // Held for the whole of a sync, so syncs never interleave
    next_block_number: Mutex<u64>,
}

impl ColonyRegistry {
    pub fn new(start_block_number: u64) -> Self {
        Self {
            addresses: RwLock::new(HashSet::new()),
            next_block_number: Mutex::new(start_block_number),
        }
    }

    pub async fn contains(&self, address: &Address) -> bool {
        self.addresses.read().await.contains(address)
    }

    /// Returns false when the colony was already registered.
    pub async fn insert(&self, address: Address) -> bool {
        self.addresses.write().await.insert(address)
    }

    pub async fn len(&self) -> usize {
        self.addresses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.addresses.read().await.is_empty()
    }

    pub async fn addresses(&self) -> Vec<Address> {
        self.addresses.read().await.iter().copied().collect()
    }

    pub async fn get_next_block_number(&self) -> u64 {
        *self.next_block_number.lock().await
    }
}

impl<R: Repo, P: Provider> Ingester<R, P> {
    /// Scans ColonyAdded logs up to `current_block_number` and registers each
    /// new colony along with its root domain. Returns how many colonies were
    /// discovered.
    ///
    /// The scan cursor only moves past batches that were fully processed, so
    /// a failed sync resumes where it stopped.
    pub async fn sync_colonies(&self, current_block_number: u64) -> Result<usize, IngesterError> {
        let mut next_block_number = self.colonies.next_block_number.lock().await;
        let mut discovered = 0;

        while *next_block_number <= current_block_number {
            let ranges = get_block_ranges(
                *next_block_number,
                current_block_number,
                self.config.blocks_per_batch,
            );

            let filters: Vec<_> = ranges
                .iter()
                .map(|(from, to)| self.contract.colony_added_filter(*from, *to))
                .collect();

            let logs_per_range = try_join_all(filters.iter().map(|filter| {
                provider::fetch_logs(
                    &*self.provider,
                    filter,
                    self.call_timeout(),
                    self.config.log_warning_threshold,
                )
            }))
            .await?;

            for ((_, to_block_number), logs) in ranges.iter().zip(logs_per_range) {
                for log in logs {
                    match ColonyEvent::decode(&log.topics, &log.data, &self.topic_registry) {
                        Ok(ColonyEvent::ColonyAdded { colony_address, .. }) => {
                            if self.register_colony(colony_address).await? {
                                discovered += 1;
                            }
                        }
                        Ok(event) => debug!("Ignoring {event} during colony sync"),
                        Err(error) => warn!(
                            transaction_hash = ?log.transaction_hash,
                            "Undecodable ColonyAdded log: {error}"
                        ),
                    }
                }

                *next_block_number = to_block_number + 1;
            }
        }

        Ok(discovered)
    }

    async fn register_colony(&self, colony_address: Address) -> Result<bool, IngesterError> {
        if self.colonies.contains(&colony_address).await {
            return Ok(false);
        }

        // Root domain before registration; a failed upsert leaves the colony unregistered
        let root_domain = UnsavedDomain::root(&Hashes::h160_to_string(&colony_address));
        with_timeout(
            self.call_timeout(),
            self.config.repo.upsert_domain(&root_domain),
        )
        .await?;

        info!(colony_address = ?colony_address, "Registered colony");

        Ok(self.colonies.insert(colony_address).await)
    }
}

/// Up to `CONCURRENT_BATCHES` inclusive block ranges starting at `from`.
fn get_block_ranges(from: u64, to: u64, blocks_per_batch: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::with_capacity(CONCURRENT_BATCHES);
    let mut range_start = from;

    while range_start <= to && ranges.len() < CONCURRENT_BATCHES {
        let range_end = min(range_start.saturating_add(blocks_per_batch - 1), to);
        ranges.push((range_start, range_end));

        range_start = range_end + 1;
    }

    ranges
}
