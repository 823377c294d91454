use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde::Deserialize;

use crate::diesel::schema::colony_domains;

/// Every colony is created with this domain, which has no parent.
pub const ROOT_DOMAIN_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = colony_domains)]
pub struct UnsavedDomain {
    pub colony_address: String,
    pub eth_domain_id: i64,
    pub eth_parent_domain_id: Option<i64>,
    pub name: String,
}

impl UnsavedDomain {
    pub fn new(colony_address: &str, eth_domain_id: i64, eth_parent_domain_id: i64) -> Self {
        Self {
            colony_address: colony_address.to_lowercase(),
            eth_domain_id,
            eth_parent_domain_id: Some(eth_parent_domain_id),
            name: format!("Domain #{eth_domain_id}"),
        }
    }

    pub fn root(colony_address: &str) -> Self {
        Self {
            colony_address: colony_address.to_lowercase(),
            eth_domain_id: ROOT_DOMAIN_ID,
            eth_parent_domain_id: None,
            name: "Root".to_string(),
        }
    }
}

/// N/B: The order has to match ./diesel.rs to stop diesel from mixing up fields
#[derive(Debug, Clone, PartialEq, Queryable, Deserialize)]
pub struct Domain {
    pub id: i64,
    pub colony_address: String,
    pub eth_domain_id: i64,
    pub eth_parent_domain_id: Option<i64>,
    pub name: String,
    pub inserted_at: DateTime<Utc>,
}
