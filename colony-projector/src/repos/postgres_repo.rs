mod migrations;
mod raw_queries;

use std::fmt::Debug;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};
use diesel_async::RunQueryDsl;

use crate::domains::{Domain, UnsavedDomain};
use crate::events::{ChainEvent, UnsavedChainEvent};

use super::repo::{Repo, RepoError, RepoMigrations, Upsert};

pub type Conn<'a> = bb8::PooledConnection<'a, AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type Pool = bb8::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

#[derive(Clone)]
pub struct PostgresRepo {
    url: String,
    pool: Pool,
}

impl Debug for PostgresRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRepo").finish_non_exhaustive()
    }
}

impl PostgresRepo {
    pub async fn new(url: &str) -> Result<Self, RepoError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|error| RepoError::Unknown(error.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            pool,
        })
    }

    pub async fn get_conn(&self) -> Result<Conn<'_>, RepoError> {
        self.pool.get().await.map_err(|_| RepoError::NotConnected)
    }
}

impl From<DieselError> for RepoError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => RepoError::Validation(info.message().to_string()),
            DieselError::BrokenTransactionManager => RepoError::NotConnected,
            other => RepoError::Unknown(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Repo for PostgresRepo {
    async fn migrate(&self) -> Result<(), RepoError> {
        let client = self.get_raw_query_client().await?;

        for migration in Self::get_internal_migrations() {
            Self::execute_raw_query(&client, migration).await?;
        }

        Ok(())
    }

    async fn upsert_chain_event(&self, event: &UnsavedChainEvent) -> Result<Upsert, RepoError> {
        use crate::diesel::schema::colony_chain_events::dsl::{
            colony_chain_events, id, log_index, transaction_hash,
        };

        let mut conn = self.get_conn().await?;

        // A returned id means this call performed the insert
        let inserted_id: Option<i64> = diesel::insert_into(colony_chain_events)
            .values(event)
            .on_conflict((transaction_hash, log_index))
            .do_nothing()
            .returning(id)
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(match inserted_id {
            Some(_) => Upsert::Inserted,
            None => Upsert::AlreadyExisted,
        })
    }

    async fn get_latest_chain_event(&self) -> Result<Option<ChainEvent>, RepoError> {
        use crate::diesel::schema::colony_chain_events::dsl::{colony_chain_events, id};

        let mut conn = self.get_conn().await?;

        let latest_event = colony_chain_events
            .order(id.desc())
            .first::<ChainEvent>(&mut conn)
            .await
            .optional()?;

        Ok(latest_event)
    }

    async fn get_all_chain_events(&self) -> Result<Vec<ChainEvent>, RepoError> {
        use crate::diesel::schema::colony_chain_events::dsl::{colony_chain_events, id};

        let mut conn = self.get_conn().await?;

        let events = colony_chain_events.order(id.asc()).load::<ChainEvent>(&mut conn).await?;

        Ok(events)
    }

    async fn upsert_domain(&self, domain: &UnsavedDomain) -> Result<Upsert, RepoError> {
        use crate::diesel::schema::colony_domains::dsl::{
            colony_address, colony_domains, eth_domain_id, id,
        };

        let mut conn = self.get_conn().await?;

        let inserted_id: Option<i64> = diesel::insert_into(colony_domains)
            .values(domain)
            .on_conflict((colony_address, eth_domain_id))
            .do_nothing()
            .returning(id)
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(match inserted_id {
            Some(_) => Upsert::Inserted,
            None => Upsert::AlreadyExisted,
        })
    }

    async fn find_domain(
        &self,
        colony_address_: &str,
        eth_domain_id_: i64,
    ) -> Result<Option<Domain>, RepoError> {
        use crate::diesel::schema::colony_domains::dsl::{
            colony_address, colony_domains, eth_domain_id,
        };

        let mut conn = self.get_conn().await?;

        let domain = colony_domains
            .filter(colony_address.eq(colony_address_.to_lowercase()))
            .filter(eth_domain_id.eq(eth_domain_id_))
            .first::<Domain>(&mut conn)
            .await
            .optional()?;

        Ok(domain)
    }

    async fn get_domains(&self, colony_address_: &str) -> Result<Vec<Domain>, RepoError> {
        use crate::diesel::schema::colony_domains::dsl::{
            colony_address, colony_domains, eth_domain_id,
        };

        let mut conn = self.get_conn().await?;

        let domains = colony_domains
            .filter(colony_address.eq(colony_address_.to_lowercase()))
            .order(eth_domain_id.asc())
            .load::<Domain>(&mut conn)
            .await?;

        Ok(domains)
    }
}
