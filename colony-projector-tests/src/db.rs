use std::env;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use dotenvy::dotenv;

/// Creates the test database when it does not exist yet.
pub fn setup() {
    let database_url = database_url();

    if PgConnection::establish(&database_url).is_ok() {
        return;
    }

    let (database_name, server_url) = split_database_url(&database_url);
    let mut server_conn = PgConnection::establish(&server_url)
        .unwrap_or_else(|_| panic!("Could not reach Postgres at {server_url}"));

    diesel::sql_query(format!(r#"CREATE DATABASE "{database_name}""#))
        .execute(&mut server_conn)
        .unwrap();
}

pub fn database_url() -> String {
    dotenv().ok();

    env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set to run Postgres tests")
}

fn split_database_url(database_url: &str) -> (String, String) {
    let (server_url, database_name) = database_url
        .rsplit_once('/')
        .expect("TEST_DATABASE_URL must end with a database name");

    (database_name.to_string(), server_url.to_string())
}
