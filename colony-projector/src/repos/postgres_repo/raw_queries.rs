use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::{PostgresRepo, RepoError};

pub type PostgresRepoRawQueryClient = Client;

impl PostgresRepo {
    pub async fn get_raw_query_client(&self) -> Result<PostgresRepoRawQueryClient, RepoError> {
        let (client, conn) = tokio_postgres::connect(&self.url, NoTls)
            .await
            .map_err(|_| RepoError::NotConnected)?;

        tokio::spawn(async move {
            if let Err(connection_error) = conn.await {
                error!("Postgres raw query connection error: {}", connection_error);
            }
        });

        Ok(client)
    }

    pub async fn execute_raw_query(
        client: &PostgresRepoRawQueryClient,
        query: &str,
    ) -> Result<(), RepoError> {
        client
            .batch_execute(query)
            .await
            .map_err(|query_error| RepoError::Unknown(query_error.to_string()))
    }
}
