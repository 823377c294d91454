#[cfg(test)]
mod tests {
    use colony_projector::{Hashes, Repo, RepoError, UnsavedChainEvent, UnsavedDomain, Upsert};

    use crate::factory::{random_colony_address, random_transaction_hash};
    use crate::test_runner;

    fn unsaved_chain_event(log_index: i64) -> UnsavedChainEvent {
        UnsavedChainEvent {
            transaction_hash: Hashes::h256_to_string(&random_transaction_hash()),
            log_index,
            address: Hashes::h160_to_string(&random_colony_address()),
            topics: serde_json::json!(["0x01"]),
            data: "0x".to_string(),
            block_number: Some(42),
        }
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    pub async fn records_a_chain_event_once() {
        test_runner::run_test(|repo| async move {
            let event = unsaved_chain_event(0);

            assert_eq!(repo.upsert_chain_event(&event).await.unwrap(), Upsert::Inserted);
            assert_eq!(
                repo.upsert_chain_event(&event).await.unwrap(),
                Upsert::AlreadyExisted
            );

            let recorded = repo
                .get_all_chain_events()
                .await
                .unwrap()
                .into_iter()
                .filter(|e| e.transaction_hash == event.transaction_hash)
                .count();
            assert_eq!(recorded, 1);
        })
        .await;
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    pub async fn returns_the_latest_chain_event() {
        test_runner::run_test(|repo| async move {
            repo.upsert_chain_event(&unsaved_chain_event(0)).await.unwrap();
            let latest = unsaved_chain_event(1);
            repo.upsert_chain_event(&latest).await.unwrap();

            let recorded = repo.get_latest_chain_event().await.unwrap().unwrap();

            assert_eq!(recorded.transaction_hash, latest.transaction_hash);
            assert_eq!(recorded.get_block_number(), Some(42));
        })
        .await;
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    pub async fn rejects_domains_without_parent() {
        test_runner::run_test(|repo| async move {
            let colony = Hashes::h160_to_string(&random_colony_address());

            let result = repo.upsert_domain(&UnsavedDomain::new(&colony, 2, 1)).await;

            assert!(matches!(result, Err(RepoError::Validation(_))));
            assert!(repo.get_domains(&colony).await.unwrap().is_empty());
        })
        .await;
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    pub async fn keeps_the_first_domain_written() {
        test_runner::run_test(|repo| async move {
            let colony = Hashes::h160_to_string(&random_colony_address());
            repo.upsert_domain(&UnsavedDomain::root(&colony)).await.unwrap();
            repo.upsert_domain(&UnsavedDomain::new(&colony, 2, 1)).await.unwrap();

            let renamed = UnsavedDomain {
                name: "Renamed".to_string(),
                ..UnsavedDomain::new(&colony, 2, 1)
            };

            assert_eq!(repo.upsert_domain(&renamed).await.unwrap(), Upsert::AlreadyExisted);

            let domain = repo.find_domain(&colony.to_uppercase(), 2).await.unwrap().unwrap();
            assert_eq!(domain.name, "Domain #2");
            assert_eq!(domain.eth_parent_domain_id, Some(1));
        })
        .await;
    }
}
