#[cfg(test)]
mod tests {
    use colony_projector::{
        ColonyEvent, DrainOutcome, Hashes, MemoryRepo, Repo, UnsavedDomain, ROOT_DOMAIN_ID,
    };
    use ethers::types::Address;

    use crate::factory::{
        add_domain_transaction, domain_added_log, named_log, random_colony_address,
        random_transaction_hash, test_config, test_ingester, unknown_log, SpyConsequenceHandler,
        TestProvider,
    };
    use crate::init_tracing;

    async fn repo_with_root(colony_address: Address) -> MemoryRepo {
        let repo = MemoryRepo::new();
        repo.upsert_domain(&UnsavedDomain::root(&Hashes::h160_to_string(&colony_address)))
            .await
            .unwrap();

        repo
    }

    #[tokio::test]
    pub async fn projects_a_domain_under_the_parent_from_its_transaction() {
        init_tracing();
        let colony_address = random_colony_address();
        let repo = repo_with_root(colony_address).await;
        let transaction_hash = random_transaction_hash();
        let provider = TestProvider::new(100).with_transaction(add_domain_transaction(
            transaction_hash,
            50,
            colony_address,
            ROOT_DOMAIN_ID as u64,
        ));
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester.enqueue_log(domain_added_log(colony_address, 3, 50, transaction_hash)).await;

        assert_eq!(ingester.drain_events().await, DrainOutcome::Drained(1));
        let domain = repo
            .find_domain(&Hashes::h160_to_string(&colony_address), 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(domain.eth_domain_id, 3);
        assert_eq!(domain.eth_parent_domain_id, Some(ROOT_DOMAIN_ID));
        assert_eq!(domain.name, "Domain #3");
    }

    #[tokio::test]
    pub async fn projects_nested_domains_in_log_order() {
        let colony_address = random_colony_address();
        let repo = repo_with_root(colony_address).await;
        let (first_hash, second_hash) = (random_transaction_hash(), random_transaction_hash());
        let provider = TestProvider::new(100)
            .with_transaction(add_domain_transaction(first_hash, 50, colony_address, 1))
            .with_transaction(add_domain_transaction(second_hash, 51, colony_address, 2));
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester.enqueue_log(domain_added_log(colony_address, 2, 50, first_hash)).await;
        ingester.enqueue_log(domain_added_log(colony_address, 3, 51, second_hash)).await;
        ingester.drain_events().await;

        let domains = repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap();
        let parents: Vec<_> =
            domains.iter().map(|d| (d.eth_domain_id, d.eth_parent_domain_id)).collect();
        assert_eq!(parents, vec![(1, None), (2, Some(1)), (3, Some(2))]);
    }

    #[tokio::test]
    pub async fn applies_consequences_once_under_duplicate_delivery() {
        let colony_address = random_colony_address();
        let repo = repo_with_root(colony_address).await;
        let transaction_hash = random_transaction_hash();
        let provider = TestProvider::new(100).with_transaction(add_domain_transaction(
            transaction_hash,
            50,
            colony_address,
            1,
        ));
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);
        let log = domain_added_log(colony_address, 2, 50, transaction_hash);

        ingester.enqueue_log(log.clone()).await;
        ingester.enqueue_log(log.clone()).await;
        ingester.drain_events().await;
        ingester.enqueue_log(log).await;
        ingester.drain_events().await;

        assert_eq!(spy.calls(), 1);
        assert_eq!(repo.get_all_chain_events().await.unwrap().len(), 1);
        assert_eq!(
            repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    pub async fn never_projects_domains_with_missing_parents() {
        for (eth_domain_id, eth_parent_domain_id) in [(2, 5), (3, 2), (4, 3), (9, 8)] {
            let colony_address = random_colony_address();
            let repo = repo_with_root(colony_address).await;
            let transaction_hash = random_transaction_hash();
            let provider = TestProvider::new(100).with_transaction(add_domain_transaction(
                transaction_hash,
                50,
                colony_address,
                eth_parent_domain_id,
            ));
            let spy = SpyConsequenceHandler::new();
            let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

            ingester
                .enqueue_log(domain_added_log(colony_address, eth_domain_id, 50, transaction_hash))
                .await;

            assert_eq!(ingester.drain_events().await, DrainOutcome::Drained(1));
            assert_eq!(spy.calls(), 1);
            assert!(repo
                .find_domain(&Hashes::h160_to_string(&colony_address), eth_domain_id as i64)
                .await
                .unwrap()
                .is_none());
            assert_eq!(repo.get_all_chain_events().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    pub async fn records_unknown_topics_without_consequences() {
        let repo = MemoryRepo::new();
        let provider = TestProvider::new(100);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester.enqueue_log(unknown_log(random_colony_address(), 50)).await;

        assert_eq!(ingester.drain_events().await, DrainOutcome::Drained(1));
        assert_eq!(spy.calls(), 0);
        assert_eq!(repo.get_all_chain_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    pub async fn hands_registered_events_without_projection_to_the_handler() {
        let colony_address = random_colony_address();
        let repo = MemoryRepo::new();
        let provider = TestProvider::new(100);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester.enqueue_log(named_log(colony_address, 50)).await;
        ingester.drain_events().await;

        assert_eq!(
            spy.events(),
            vec![ColonyEvent::Other {
                name: "TaskAdded".to_string()
            }]
        );
        assert!(repo
            .get_domains(&Hashes::h160_to_string(&colony_address))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    pub async fn projects_the_root_domain_without_a_transaction() {
        let colony_address = random_colony_address();
        let repo = MemoryRepo::new();
        let provider = TestProvider::new(100);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester
            .enqueue_log(domain_added_log(colony_address, 1, 40, random_transaction_hash()))
            .await;
        ingester.drain_events().await;

        let root = repo
            .find_domain(&Hashes::h160_to_string(&colony_address), ROOT_DOMAIN_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(root.eth_parent_domain_id, None);
        assert_eq!(root.name, "Root");
    }

    #[tokio::test]
    pub async fn skips_domains_whose_transaction_is_unavailable() {
        let colony_address = random_colony_address();
        let repo = repo_with_root(colony_address).await;
        let provider = TestProvider::new(100);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        ingester
            .enqueue_log(domain_added_log(colony_address, 2, 50, random_transaction_hash()))
            .await;
        ingester.enqueue_log(unknown_log(colony_address, 51)).await;

        assert_eq!(ingester.drain_events().await, DrainOutcome::Drained(2));
        assert_eq!(repo.get_all_chain_events().await.unwrap().len(), 2);
        assert_eq!(
            repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    pub async fn skips_logs_without_a_transaction_hash() {
        let repo = MemoryRepo::new();
        let provider = TestProvider::new(100);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);
        let mut log = unknown_log(random_colony_address(), 50);
        log.transaction_hash = None;

        ingester.enqueue_log(log).await;

        assert_eq!(ingester.drain_events().await, DrainOutcome::Drained(1));
        assert!(repo.get_all_chain_events().await.unwrap().is_empty());
    }
}
