use std::time::Duration;

use ethers::types::H256;

use crate::{ConfigError, RepoError};

use super::ProviderError;

/// A log or transaction that could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("log is missing {0}")]
    MissingLogField(&'static str),
    #[error("log has no topics")]
    MissingTopic,
    #[error("abi decoding failed: {0}")]
    Abi(String),
    #[error("unrecognized function selector {0}")]
    UnrecognizedCall(String),
    #[error("transaction {0:?} not found")]
    MissingTransaction(H256),
    #[error("transaction {0:?} is not mined yet")]
    PendingTransaction(H256),
}

#[derive(Debug, thiserror::Error)]
pub enum IngesterError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(
        "parent domain {eth_parent_domain_id} of domain {eth_domain_id} \
         is not projected for colony {colony_address}"
    )]
    MissingParentDomain {
        colony_address: String,
        eth_domain_id: i64,
        eth_parent_domain_id: i64,
    },
}

impl IngesterError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            IngesterError::Provider(_)
                | IngesterError::Timeout(_)
                | IngesterError::Repo(RepoError::NotConnected | RepoError::Unknown(_))
        )
    }
}
