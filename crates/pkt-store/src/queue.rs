use crate::Postgres;
use pkt_core::ID;
use pkt_core::Unique;
use pkt_pg::*;
use pkt_records::HandRecord;
use pkt_records::QueueStatus;
use pkt_records::RecordError;
use pkt_records::SyncItem;
use std::time::Duration;
use std::time::SystemTime;
use tokio_postgres::GenericClient;
use tokio_postgres::Row;

/// Repository trait for the durable sync queue.
///
/// [`claim`] is the sole concurrency-control point for horizontally scaled
/// workers: the pending-to-processing flip is one atomic read-modify-write,
/// so two claimants never hold the same item.
///
/// [`claim`]: SyncRepository::claim
#[allow(async_fn_in_trait)]
pub trait SyncRepository {
    /// Appends a fresh pending item for a hand.
    async fn enqueue(&self, hand: ID<HandRecord>) -> Result<SyncItem, RecordError>;
    /// Atomically leases due items: pending, or failed with retry budget
    /// left. Oldest first, at most `limit`.
    async fn claim(&self, limit: usize, max_retries: u32) -> Result<Vec<SyncItem>, RecordError>;
    /// Closes an item out; a fatal delivery error rides along so the
    /// rejection stays visible without consuming retries.
    async fn complete(&self, item: ID<SyncItem>, error: Option<&str>) -> Result<(), RecordError>;
    /// Records a failed attempt and consumes one retry.
    async fn fail(&self, item: ID<SyncItem>, error: &str) -> Result<(), RecordError>;
    /// Terminally failed items, newest first. Never claimed again.
    async fn dead_letters(&self, max_retries: u32) -> Result<Vec<SyncItem>, RecordError>;
    /// Sweeps stale leases: items processing longer than `liveness` return
    /// to pending. Returns how many were released.
    async fn recover(&self, liveness: Duration) -> Result<u64, RecordError>;
    /// Drops every item for a hand (cascade on hand deletion).
    async fn purge(&self, hand: ID<HandRecord>) -> Result<u64, RecordError>;
}

impl SyncRepository for Postgres {
    async fn enqueue(&self, hand: ID<HandRecord>) -> Result<SyncItem, RecordError> {
        let item = SyncItem::enqueued(hand);
        let client = self.client().await;
        insert_item(&*client, &item).await?;
        log::debug!("[queue] enqueued {} for hand {}", item.id(), hand);
        Ok(item)
    }

    async fn claim(&self, limit: usize, max_retries: u32) -> Result<Vec<SyncItem>, RecordError> {
        // SKIP LOCKED keeps concurrent workers from blocking on, or
        // double-claiming, each other's rows.
        let client = self.client().await;
        client
            .query(
                const_format::concatcp!(
                    "UPDATE ",
                    SYNC_QUEUE,
                    " SET status = 'processing', claimed_at = now()
                      WHERE id IN (
                          SELECT id FROM ",
                    SYNC_QUEUE,
                    "     WHERE status = 'pending'
                             OR (status = 'failed' AND retries < $2)
                          ORDER BY created_at ASC
                          LIMIT $1
                          FOR UPDATE SKIP LOCKED
                      )
                      RETURNING id, hand_id, status, created_at, claimed_at, completed_at, retries, error"
                ),
                &[&(limit as i64), &(max_retries as i32)],
            )
            .await?
            .iter()
            .map(hydrate_item)
            .collect()
    }

    async fn complete(&self, item: ID<SyncItem>, error: Option<&str>) -> Result<(), RecordError> {
        let client = self.client().await;
        client
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    SYNC_QUEUE,
                    " SET status = 'completed', completed_at = now(), error = $2 WHERE id = $1"
                ),
                &[&item.inner(), &error],
            )
            .await?;
        Ok(())
    }

    async fn fail(&self, item: ID<SyncItem>, error: &str) -> Result<(), RecordError> {
        let client = self.client().await;
        client
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    SYNC_QUEUE,
                    " SET status = 'failed', retries = retries + 1, error = $2 WHERE id = $1"
                ),
                &[&item.inner(), &error],
            )
            .await?;
        Ok(())
    }

    async fn dead_letters(&self, max_retries: u32) -> Result<Vec<SyncItem>, RecordError> {
        let client = self.client().await;
        client
            .query(
                const_format::concatcp!(
                    "SELECT id, hand_id, status, created_at, claimed_at, completed_at, retries, error FROM ",
                    SYNC_QUEUE,
                    " WHERE status = 'failed' AND retries >= $1 ORDER BY created_at DESC"
                ),
                &[&(max_retries as i32)],
            )
            .await?
            .iter()
            .map(hydrate_item)
            .collect()
    }

    async fn recover(&self, liveness: Duration) -> Result<u64, RecordError> {
        let cutoff = SystemTime::now()
            .checked_sub(liveness)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let client = self.client().await;
        let released = client
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    SYNC_QUEUE,
                    " SET status = 'pending', claimed_at = NULL
                      WHERE status = 'processing' AND claimed_at < $1"
                ),
                &[&cutoff],
            )
            .await?;
        Ok(released)
    }

    async fn purge(&self, hand: ID<HandRecord>) -> Result<u64, RecordError> {
        let client = self.client().await;
        let dropped = client
            .execute(
                const_format::concatcp!("DELETE FROM ", SYNC_QUEUE, " WHERE hand_id = $1"),
                &[&hand.inner()],
            )
            .await?;
        Ok(dropped)
    }
}

/// Shared with the hand repository, whose create and update write the queue
/// item inside their own transaction.
pub(crate) async fn insert_item<C>(client: &C, item: &SyncItem) -> Result<(), PgErr>
where
    C: GenericClient,
{
    client
        .execute(
            const_format::concatcp!(
                "INSERT INTO ",
                SYNC_QUEUE,
                " (id, hand_id, status, created_at, claimed_at, completed_at, retries, error)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ),
            &[
                &item.id().inner(),
                &item.hand().inner(),
                &item.status().to_string(),
                &item.created_at(),
                &item.claimed_at(),
                &item.completed_at(),
                &(item.retries() as i32),
                &item.error(),
            ],
        )
        .await
        .map(|_| ())
}

fn hydrate_item(row: &Row) -> Result<SyncItem, RecordError> {
    Ok(SyncItem::hydrate(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        QueueStatus::try_from(row.get::<_, &str>(2)).map_err(RecordError::Validation)?,
        row.get::<_, SystemTime>(3),
        row.get::<_, Option<SystemTime>>(4),
        row.get::<_, Option<SystemTime>>(5),
        row.get::<_, i32>(6) as u32,
        row.get::<_, Option<String>>(7),
    ))
}
