#[cfg(test)]
mod tests {
    use colony_projector::{MemoryRepo, Repo, UnsavedDomain, Upsert};
    use futures_util::future::join_all;

    #[tokio::test]
    pub async fn inserts_a_domain_once_under_concurrent_writers() {
        let repo = MemoryRepo::new();
        repo.upsert_domain(&UnsavedDomain::root("0xcc")).await.unwrap();

        let domain = UnsavedDomain::new("0xcc", 2, 1);
        let upserts = join_all((0..8).map(|_| repo.upsert_domain(&domain))).await;

        let inserted = upserts
            .into_iter()
            .filter(|upsert| matches!(upsert, Ok(Upsert::Inserted)))
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(repo.get_domains("0xcc").await.unwrap().len(), 2);
    }

    #[tokio::test]
    pub async fn scopes_domains_by_colony() {
        let repo = MemoryRepo::new();
        repo.upsert_domain(&UnsavedDomain::root("0xaa")).await.unwrap();
        repo.upsert_domain(&UnsavedDomain::root("0xbb")).await.unwrap();

        let result = repo.upsert_domain(&UnsavedDomain::new("0xbb", 2, 1)).await;

        assert_eq!(result.unwrap(), Upsert::Inserted);
        assert!(repo.find_domain("0xaa", 2).await.unwrap().is_none());
    }
}
