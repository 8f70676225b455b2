//! PostgreSQL connectivity, table constants, and DDL generation.
//!
//! Low-level database plumbing shared by the repository implementations.
//! SQL text is assembled at compile time with [`const_format::concatcp!`]
//! over the table-name constants below, so a rename never drifts between
//! DDL and queries.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from `DB_URL`
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation per persisted entity
mod schema;

pub use schema::*;

use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the `DB_URL` environment variable, spawns
/// the connection task, and returns the client.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if connection fails.
pub async fn db() -> Client {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    client
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for recorded poker hands.
#[rustfmt::skip]
pub const HANDS:      &str = "hands";
/// Table for the ordered betting actions of each hand.
#[rustfmt::skip]
pub const ACTIONS:    &str = "actions";
/// Table for pending external synchronization work items.
#[rustfmt::skip]
pub const SYNC_QUEUE: &str = "sync_queue";
