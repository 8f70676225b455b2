use super::HandRecord;
use pkt_core::ID;
use pkt_core::Unique;
use std::time::SystemTime;

/// A hand's current relationship with the external collaborator.
///
/// `Pending` from the moment of any local write until the worker delivers
/// it; `Failed` covers both a retryable setback and a terminal rejection —
/// the queue item's error text tells them apart.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

/// str isomorphism
impl TryFrom<&str> for SyncStatus {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid sync status str: {}", s)),
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Synced => write!(f, "synced"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A queue item's position in the delivery state machine.
///
/// `Pending → Processing → {Completed, Failed}`, with `Failed → Processing`
/// retries while the retry budget lasts. `Processing` is a lease, not a
/// terminal state: items stuck there past the liveness timeout are swept
/// back to `Pending` on worker startup.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum QueueStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

/// str isomorphism
impl TryFrom<&str> for QueueStatus {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid queue status str: {}", s)),
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One unit of pending propagation work: "push this hand to the external
/// collaborator".
///
/// References its hand without owning it — the hand may be deleted while
/// the item waits, and the worker treats that as an expected race. Multiple
/// historical items may exist per hand; only the newest reflects current
/// sync state.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncItem {
    id: ID<Self>,
    hand: ID<HandRecord>,
    status: QueueStatus,
    created_at: SystemTime,
    claimed_at: Option<SystemTime>,
    completed_at: Option<SystemTime>,
    retries: u32,
    error: Option<String>,
}

impl SyncItem {
    /// A fresh pending item for a just-written hand.
    pub fn enqueued(hand: ID<HandRecord>) -> Self {
        Self {
            id: ID::default(),
            hand,
            status: QueueStatus::Pending,
            created_at: SystemTime::now(),
            claimed_at: None,
            completed_at: None,
            retries: 0,
            error: None,
        }
    }
    /// Reconstructs an item from its persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn hydrate(
        id: ID<Self>,
        hand: ID<HandRecord>,
        status: QueueStatus,
        created_at: SystemTime,
        claimed_at: Option<SystemTime>,
        completed_at: Option<SystemTime>,
        retries: u32,
        error: Option<String>,
    ) -> Self {
        Self {
            id,
            hand,
            status,
            created_at,
            claimed_at,
            completed_at,
            retries,
            error,
        }
    }
    pub fn hand(&self) -> ID<HandRecord> {
        self.hand
    }
    pub fn status(&self) -> QueueStatus {
        self.status
    }
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
    pub fn claimed_at(&self) -> Option<SystemTime> {
        self.claimed_at
    }
    pub fn completed_at(&self) -> Option<SystemTime> {
        self.completed_at
    }
    pub fn retries(&self) -> u32 {
        self.retries
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    /// True once the retry budget is spent; such items never claim again.
    pub fn is_dead(&self, max_retries: u32) -> bool {
        self.status == QueueStatus::Failed && self.retries >= max_retries
    }

    /// Lease the item to a worker.
    pub fn claim(&mut self) {
        self.status = QueueStatus::Processing;
        self.claimed_at = Some(SystemTime::now());
    }
    /// Close the item out, optionally recording a fatal delivery error.
    pub fn complete(&mut self, error: Option<String>) {
        self.status = QueueStatus::Completed;
        self.completed_at = Some(SystemTime::now());
        self.error = error;
    }
    /// Record a failed attempt and consume one retry.
    pub fn fail(&mut self, error: String) {
        self.status = QueueStatus::Failed;
        self.retries += 1;
        self.error = Some(error);
    }
    /// Return a stale lease to the pending pool.
    pub fn release(&mut self) {
        self.status = QueueStatus::Pending;
        self.claimed_at = None;
    }
}

impl Unique for SyncItem {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use pkt_pg::*;

    /// No foreign key: queue items reference hands without ownership, and
    /// hand deletion purges them explicitly in the same transaction.
    impl Schema for SyncItem {
        fn name() -> &'static str {
            SYNC_QUEUE
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SYNC_QUEUE,
                " (
                    id           UUID PRIMARY KEY,
                    hand_id      UUID NOT NULL,
                    status       TEXT NOT NULL,
                    created_at   TIMESTAMPTZ NOT NULL,
                    claimed_at   TIMESTAMPTZ,
                    completed_at TIMESTAMPTZ,
                    retries      INTEGER NOT NULL DEFAULT 0,
                    error        TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sync_queue_claim ON ",
                SYNC_QUEUE,
                " (status, created_at);
                 CREATE INDEX IF NOT EXISTS idx_sync_queue_hand ON ",
                SYNC_QUEUE,
                " (hand_id);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_item_is_pending() {
        let item = SyncItem::enqueued(ID::default());
        assert_eq!(item.status(), QueueStatus::Pending);
        assert_eq!(item.retries(), 0);
        assert!(item.error().is_none());
    }

    #[test]
    fn fail_consumes_budget() {
        let mut item = SyncItem::enqueued(ID::default());
        item.claim();
        item.fail("timeout".into());
        item.claim();
        item.fail("timeout".into());
        item.claim();
        item.fail("timeout".into());
        assert!(item.is_dead(3));
        assert_eq!(item.error(), Some("timeout"));
    }

    #[test]
    fn complete_with_error_is_not_dead() {
        // Fatal rejections close out immediately without touching the budget.
        let mut item = SyncItem::enqueued(ID::default());
        item.claim();
        item.complete(Some("payload rejected".into()));
        assert_eq!(item.status(), QueueStatus::Completed);
        assert!(!item.is_dead(3));
        assert_eq!(item.retries(), 0);
    }

    #[test]
    fn release_returns_to_pending() {
        let mut item = SyncItem::enqueued(ID::default());
        item.claim();
        assert!(item.claimed_at().is_some());
        item.release();
        assert_eq!(item.status(), QueueStatus::Pending);
        assert!(item.claimed_at().is_none());
    }
}
