use tracing::{debug, info};

use crate::domains::{UnsavedDomain, ROOT_DOMAIN_ID};
use crate::ingester::provider::{self, with_timeout};
use crate::ingester::{DecodeError, IngesterError, Provider};
use crate::{Repo, Upsert};

use super::ConsequenceContext;

/// Projects the domain announced by a DomainAdded log emitted by a colony.
///
/// The parent is read from the calldata of the transaction that emitted the
/// log and must already be projected. The root domain needs neither.
pub async fn apply<R: Repo, P: Provider>(
    context: &ConsequenceContext<'_, R, P>,
    domain_id: u64,
) -> Result<(), IngesterError> {
    let ConsequenceContext {
        chain_event,
        log,
        repo,
        provider,
        contract,
        call_timeout,
        ..
    } = context;

    let colony_address = chain_event.address.as_str();
    let eth_domain_id = domain_id as i64;

    // Saves the transaction fetch; upsert_domain still decides on conflicts
    let existing_domain =
        with_timeout(*call_timeout, repo.find_domain(colony_address, eth_domain_id)).await?;
    if existing_domain.is_some() {
        debug!(colony_address, eth_domain_id, "Domain already projected");
        return Ok(());
    }

    let domain = if eth_domain_id == ROOT_DOMAIN_ID {
        UnsavedDomain::root(colony_address)
    } else {
        let transaction_hash = log
            .transaction_hash
            .ok_or(DecodeError::MissingLogField("transaction_hash"))?;
        let transaction =
            provider::fetch_transaction(*provider, transaction_hash, *call_timeout).await?;

        let eth_parent_domain_id = contract.decode_parent_domain_id(&transaction.input)? as i64;

        let parent_domain = with_timeout(
            *call_timeout,
            repo.find_domain(colony_address, eth_parent_domain_id),
        )
        .await?;
        if parent_domain.is_none() {
            return Err(IngesterError::MissingParentDomain {
                colony_address: colony_address.to_string(),
                eth_domain_id,
                eth_parent_domain_id,
            });
        }

        UnsavedDomain::new(colony_address, eth_domain_id, eth_parent_domain_id)
    };

    match with_timeout(*call_timeout, repo.upsert_domain(&domain)).await? {
        Upsert::Inserted => info!(
            colony_address,
            eth_domain_id,
            eth_parent_domain_id = ?domain.eth_parent_domain_id,
            "Projected domain"
        ),
        Upsert::AlreadyExisted => debug!(colony_address, eth_domain_id, "Domain already projected"),
    }

    Ok(())
}
