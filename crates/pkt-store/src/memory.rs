use crate::HandRepository;
use crate::SyncRepository;
use pkt_core::ID;
use pkt_core::Unique;
use pkt_records::HandDraft;
use pkt_records::HandRecord;
use pkt_records::Owner;
use pkt_records::QueueStatus;
use pkt_records::RecordError;
use pkt_records::SyncItem;
use pkt_records::SyncStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;

/// In-process store backing both repository traits.
///
/// One mutex guards hands and queue together, so the create-hand-plus-
/// enqueue write is exactly as atomic as the postgres transaction it mirrors.
/// Cloning shares the underlying state, matching [`Postgres`](crate::Postgres)
/// handle semantics.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    inner: Arc<Mutex<Inner>>,
}

/// uuid v7 keys sort by creation time, so in-order iteration is FIFO.
#[derive(Debug, Default)]
struct Inner {
    hands: BTreeMap<uuid::Uuid, HandRecord>,
    queue: BTreeMap<uuid::Uuid, SyncItem>,
}

impl Memory {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store lock")
    }
    /// Direct queue-item read, for tests and diagnostics.
    pub fn item(&self, id: ID<SyncItem>) -> Option<SyncItem> {
        self.lock().queue.get(&id.inner()).cloned()
    }
    /// Every queue item for one hand, oldest first.
    pub fn items_for(&self, hand: ID<HandRecord>) -> Vec<SyncItem> {
        self.lock()
            .queue
            .values()
            .filter(|i| i.hand() == hand)
            .cloned()
            .collect()
    }
}

impl HandRepository for Memory {
    async fn create(&self, owner: ID<Owner>, draft: HandDraft) -> Result<HandRecord, RecordError> {
        draft.validate()?;
        let hand = HandRecord::create(owner, draft);
        let item = SyncItem::enqueued(hand.id());
        let mut inner = self.lock();
        inner.hands.insert(hand.id().inner(), hand.clone());
        inner.queue.insert(item.id().inner(), item);
        Ok(hand)
    }

    async fn get(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<HandRecord, RecordError> {
        self.lock()
            .hands
            .get(&id.inner())
            .filter(|h| h.owner() == owner)
            .cloned()
            .ok_or(RecordError::NotFound)
    }

    async fn list(&self, owner: ID<Owner>) -> Result<Vec<HandRecord>, RecordError> {
        let mut hands = self
            .lock()
            .hands
            .values()
            .filter(|h| h.owner() == owner)
            .cloned()
            .collect::<Vec<_>>();
        hands.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id())));
        Ok(hands)
    }

    async fn update(
        &self,
        id: ID<HandRecord>,
        owner: ID<Owner>,
        draft: HandDraft,
    ) -> Result<HandRecord, RecordError> {
        draft.validate()?;
        let item = SyncItem::enqueued(id);
        let mut inner = self.lock();
        let hand = inner
            .hands
            .get_mut(&id.inner())
            .filter(|h| h.owner() == owner)
            .ok_or(RecordError::NotFound)?;
        hand.revise(draft);
        let hand = hand.clone();
        inner.queue.insert(item.id().inner(), item);
        Ok(hand)
    }

    async fn delete(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<(), RecordError> {
        let mut inner = self.lock();
        match inner.hands.get(&id.inner()) {
            Some(h) if h.owner() == owner => {
                inner.hands.remove(&id.inner());
                inner.queue.retain(|_, item| item.hand() != id);
                Ok(())
            }
            _ => Err(RecordError::NotFound),
        }
    }

    async fn load(&self, id: ID<HandRecord>) -> Result<Option<HandRecord>, RecordError> {
        Ok(self.lock().hands.get(&id.inner()).cloned())
    }

    async fn set_sync(&self, id: ID<HandRecord>, sync: SyncStatus) -> Result<(), RecordError> {
        if let Some(hand) = self.lock().hands.get_mut(&id.inner()) {
            hand.set_sync(sync);
        }
        Ok(())
    }
}

impl SyncRepository for Memory {
    async fn enqueue(&self, hand: ID<HandRecord>) -> Result<SyncItem, RecordError> {
        let item = SyncItem::enqueued(hand);
        self.lock().queue.insert(item.id().inner(), item.clone());
        Ok(item)
    }

    async fn claim(&self, limit: usize, max_retries: u32) -> Result<Vec<SyncItem>, RecordError> {
        // The single guard makes the whole sweep one read-modify-write.
        let mut inner = self.lock();
        let due = inner
            .queue
            .values()
            .filter(|i| match i.status() {
                QueueStatus::Pending => true,
                QueueStatus::Failed => i.retries() < max_retries,
                _ => false,
            })
            .map(|i| i.id())
            .take(limit)
            .collect::<Vec<_>>();
        let mut claimed = Vec::with_capacity(due.len());
        for id in due {
            if let Some(item) = inner.queue.get_mut(&id.inner()) {
                item.claim();
                claimed.push(item.clone());
            }
        }
        Ok(claimed)
    }

    async fn complete(&self, item: ID<SyncItem>, error: Option<&str>) -> Result<(), RecordError> {
        if let Some(item) = self.lock().queue.get_mut(&item.inner()) {
            item.complete(error.map(String::from));
        }
        Ok(())
    }

    async fn fail(&self, item: ID<SyncItem>, error: &str) -> Result<(), RecordError> {
        if let Some(item) = self.lock().queue.get_mut(&item.inner()) {
            item.fail(error.to_string());
        }
        Ok(())
    }

    async fn dead_letters(&self, max_retries: u32) -> Result<Vec<SyncItem>, RecordError> {
        let mut dead = self
            .lock()
            .queue
            .values()
            .filter(|i| i.is_dead(max_retries))
            .cloned()
            .collect::<Vec<_>>();
        dead.reverse();
        Ok(dead)
    }

    async fn recover(&self, liveness: Duration) -> Result<u64, RecordError> {
        let cutoff = SystemTime::now()
            .checked_sub(liveness)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let mut released = 0;
        for item in self.lock().queue.values_mut() {
            if item.status() == QueueStatus::Processing
                && item.claimed_at().is_some_and(|at| at < cutoff)
            {
                item.release();
                released += 1;
            }
        }
        Ok(released)
    }

    async fn purge(&self, hand: ID<HandRecord>) -> Result<u64, RecordError> {
        let mut inner = self.lock();
        let before = inner.queue.len();
        inner.queue.retain(|_, item| item.hand() != hand);
        Ok((before - inner.queue.len()) as u64)
    }
}
