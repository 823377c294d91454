#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use colony_projector::{Config, Hashes, IngesterError, MemoryRepo, Repo};

    use crate::factory::{
        add_domain_transaction, colony_added_log, domain_added_log, random_colony_address,
        random_transaction_hash, test_config, test_ingester, unknown_log, SpyConsequenceHandler,
        TestProvider,
    };
    use crate::init_tracing;

    #[tokio::test]
    pub async fn keeps_projecting_new_blocks_until_stopped() {
        init_tracing();
        let repo = MemoryRepo::new();
        let colony_address = random_colony_address();
        let provider = TestProvider::new(10).with_logs([colony_added_log(1, colony_address, 2)]);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        let task = ingester.clone().start().await.unwrap();

        let transaction_hash = random_transaction_hash();
        provider.add_transaction(add_domain_transaction(transaction_hash, 12, colony_address, 1));
        provider.add_log(domain_added_log(colony_address, 2, 12, transaction_hash));
        provider.set_current_block_number(12);

        let colony = Hashes::h160_to_string(&colony_address);
        let mut domains = vec![];
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;

            domains = repo.get_domains(&colony).await.unwrap();
            if domains.len() == 2 {
                break;
            }
        }

        task.stop().await;

        let ids: Vec<_> = domains.iter().map(|d| d.eth_domain_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(spy.calls(), 1);
    }

    #[tokio::test]
    pub async fn discovers_colonies_created_after_start() {
        let repo = MemoryRepo::new();
        let provider = TestProvider::new(10);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        let task = ingester.clone().start().await.unwrap();

        let colony_address = random_colony_address();
        provider.add_log(colony_added_log(1, colony_address, 11));
        provider.set_current_block_number(11);

        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;

            if ingester.colonies().contains(&colony_address).await {
                break;
            }
        }

        task.stop().await;

        assert!(ingester.colonies().contains(&colony_address).await);
        assert_eq!(
            repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    pub async fn holds_the_head_until_new_colonies_are_registered() {
        let repo = MemoryRepo::new();
        let colony_address = random_colony_address();
        let transaction_hash = random_transaction_hash();
        let provider = TestProvider::new(10)
            .with_logs([
                colony_added_log(1, colony_address, 11),
                domain_added_log(colony_address, 2, 12, transaction_hash),
            ])
            .with_transaction(add_domain_transaction(transaction_hash, 12, colony_address, 1));
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);
        ingester.sync_colonies(10).await.unwrap();
        provider.set_current_block_number(12);
        provider.fail_block(11);

        assert!(ingester.watch_chain_head(10).await.is_err());
        assert!(ingester.block_queue().is_empty().await);

        provider.restore_block(11);
        assert_eq!(ingester.watch_chain_head(10).await.unwrap(), 12);
        ingester.drain_blocks().await;
        ingester.drain_events().await;

        let domains = repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap();
        let ids: Vec<_> = domains.iter().map(|d| d.eth_domain_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    pub async fn retries_startup_until_the_provider_recovers() {
        let repo = MemoryRepo::new();
        let colony_address = random_colony_address();
        let provider = TestProvider::new(10).with_logs([colony_added_log(1, colony_address, 5)]);
        provider.fail_block(5);
        let spy = SpyConsequenceHandler::new();
        let config = test_config(repo.clone()).with_retry_backoff_ms(5);
        let ingester = test_ingester(&config, &provider, &spy);

        let starting = tokio::spawn(ingester.clone().start());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!starting.is_finished());

        provider.restore_block(5);
        let task = starting.await.unwrap().unwrap();
        task.stop().await;

        assert!(ingester.colonies().contains(&colony_address).await);
        assert_eq!(
            repo.get_domains(&Hashes::h160_to_string(&colony_address)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    pub async fn catches_up_only_to_the_head_colonies_were_synced_to() {
        let repo = MemoryRepo::new();
        let colony_address = random_colony_address();
        let provider = TestProvider::new(10)
            .with_logs([
                colony_added_log(1, colony_address, 11),
                unknown_log(colony_address, 11),
            ])
            .with_head_increment(1);
        let spy = SpyConsequenceHandler::new();
        let ingester = test_ingester(&test_config(repo.clone()), &provider, &spy);

        let task = ingester.clone().start().await.unwrap();

        let mut recorded = 0;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;

            recorded = repo.get_all_chain_events().await.unwrap().len();
            if recorded == 1 {
                break;
            }
        }

        task.stop().await;

        assert_eq!(recorded, 1);
    }

    #[tokio::test]
    pub async fn refuses_invalid_configs() {
        let config = Config::new(MemoryRepo::new(), "not-an-address");
        let provider = Arc::new(TestProvider::new(10));

        let result = colony_projector::start(&config, provider).await;

        assert!(matches!(result, Err(IngesterError::Config(_))));
    }
}
