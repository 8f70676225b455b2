//! Owner-scoped hand persistence and the durable sync queue.
//!
//! Two repository traits over one logical store: [`HandRepository`] owns the
//! hand records and their action sub-records, [`SyncRepository`] owns the
//! queue of pending propagation work. Every create or update writes the hand
//! and its queue item in one atomic unit, so no hand can exist without a
//! matching sync obligation.
//!
//! Both traits ship two backends: [`Postgres`] for the real store and
//! [`Memory`] for tests and embedded use. The queue's atomic
//! pending-to-processing claim is the sole concurrency-control point shared
//! by horizontally scaled workers.
mod hands;
mod memory;
mod queue;

pub use hands::*;
pub use memory::*;
pub use queue::*;

use pkt_pg::PgErr;
use pkt_records::HandRecord;
use pkt_records::PlayerAction;
use pkt_records::SyncItem;
use std::sync::Arc;
use tokio_postgres::Client;

/// Postgres-backed store handle.
///
/// The connection sits behind an async mutex so a transaction holds the
/// session exclusively from open to commit; concurrent callers queue rather
/// than interleave statements on one session. Cloning shares the connection.
#[derive(Clone)]
pub struct Postgres {
    inner: Arc<tokio::sync::Mutex<Client>>,
}

impl Postgres {
    pub fn new(client: Client) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(client)),
        }
    }
    pub(crate) async fn client(&self) -> tokio::sync::MutexGuard<'_, Client> {
        self.inner.lock().await
    }
}

/// Creates all tables and indices if absent. Idempotent.
pub async fn migrate(client: &tokio_postgres::Client) -> Result<(), PgErr> {
    pkt_pg::create::<HandRecord>(client).await?;
    pkt_pg::create::<PlayerAction>(client).await?;
    pkt_pg::create::<SyncItem>(client).await?;
    log::info!("[store] schema ready");
    Ok(())
}
