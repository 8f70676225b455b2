use super::Delivery;
use super::DeliveryError;
use pkt_core::Unique;
use pkt_records::RecordError;
use pkt_records::SyncItem;
use pkt_records::SyncStatus;
use pkt_store::HandRepository;
use pkt_store::SyncRepository;
use std::time::Duration;

/// The recurring process that turns queue items into delivered hands.
///
/// Generic over the store (both repository traits, so `Postgres` and
/// `Memory` both qualify) and the outward transport. Safe to run in
/// multiple instances: the queue's atomic claim keeps them from treading
/// on each other, and a startup [`recover`](Self::recover) sweep returns
/// leases orphaned by a crashed sibling.
pub struct Worker<R, D> {
    store: R,
    transport: D,
    batch: usize,
    max_retries: u32,
    attempt: Duration,
    liveness: Duration,
}

impl<R, D> Worker<R, D>
where
    R: HandRepository + SyncRepository,
    D: Delivery,
{
    pub fn new(store: R, transport: D) -> Self {
        Self {
            store,
            transport,
            batch: pkt_core::CLAIM_BATCH,
            max_retries: pkt_core::MAX_RETRIES,
            attempt: Duration::from_secs(pkt_core::ATTEMPT_SECS),
            liveness: Duration::from_secs(pkt_core::LIVENESS_SECS),
        }
    }
    pub fn batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
    pub fn attempt(mut self, attempt: Duration) -> Self {
        self.attempt = attempt;
        self
    }
    pub fn liveness(mut self, liveness: Duration) -> Self {
        self.liveness = liveness;
        self
    }

    /// Returns leases stuck in processing past the liveness window to the
    /// pending pool. Run once on startup, before the first claim.
    pub async fn recover(&self) -> Result<u64, RecordError> {
        let released = self.store.recover(self.liveness).await?;
        if released > 0 {
            log::warn!("[worker] recovered {} stale claims", released);
        }
        Ok(released)
    }

    /// One poll: claim a batch of due items and process each in turn.
    /// Returns how many items were claimed. A write-back error on one item
    /// is logged and the rest of the batch still drains; the stuck item
    /// stays leased until the next recovery sweep.
    pub async fn cycle(&self) -> Result<usize, RecordError> {
        let items = self.store.claim(self.batch, self.max_retries).await?;
        let claimed = items.len();
        for item in items {
            let id = item.id();
            if let Err(e) = self.process(item).await {
                log::error!("[worker] write-back failed for item {}: {}", id, e);
            }
        }
        Ok(claimed)
    }

    /// Delivers one claimed item and writes the outcome back to the queue
    /// item and its hand. A hand deleted after enqueue is an expected race
    /// and fails the orphaned item without aborting the batch.
    async fn process(&self, item: SyncItem) -> Result<(), RecordError> {
        let Some(hand) = self.store.load(item.hand()).await? else {
            log::warn!("[worker] hand {} gone, dropping item {}", item.hand(), item.id());
            return self.store.fail(item.id(), "hand deleted").await;
        };
        let outcome = match tokio::time::timeout(self.attempt, self.transport.deliver(&hand)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(DeliveryError::Retryable("delivery attempt timed out".into())),
        };
        match outcome {
            Ok(()) => {
                log::debug!("[worker] delivered hand {}", hand.id());
                self.store.complete(item.id(), None).await?;
                self.store.set_sync(item.hand(), SyncStatus::Synced).await
            }
            Err(DeliveryError::Retryable(reason)) => {
                match item.retries() + 1 >= self.max_retries {
                    true => log::error!("[worker] item {} terminally failed: {}", item.id(), reason),
                    false => log::warn!("[worker] item {} will retry: {}", item.id(), reason),
                }
                self.store.fail(item.id(), &reason).await?;
                self.store.set_sync(item.hand(), SyncStatus::Failed).await
            }
            Err(DeliveryError::Fatal(reason)) => {
                // permanent rejection: close out now, spend no retries
                log::error!("[worker] hand {} rejected: {}", hand.id(), reason);
                self.store.complete(item.id(), Some(&reason)).await?;
                self.store.set_sync(item.hand(), SyncStatus::Failed).await
            }
        }
    }

    /// Poll loop: a recovery sweep, then a cycle every `every` until an
    /// interrupt is requested. Store errors are logged and polled through,
    /// never fatal to the loop.
    pub async fn run(self, every: Duration) {
        if let Err(e) = self.recover().await {
            log::error!("[worker] recovery sweep failed: {}", e);
        }
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if pkt_core::interrupted() {
                break;
            }
            match self.cycle().await {
                Ok(0) => {}
                Ok(n) => log::info!("[worker] processed {} items", n),
                Err(e) => log::error!("[worker] cycle failed: {}", e),
            }
        }
        log::info!("[worker] stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_cards::Card;
    use pkt_core::ID;
    use pkt_gameplay::Action;
    use pkt_gameplay::Seat;
    use pkt_gameplay::Stage;
    use pkt_records::HandDraft;
    use pkt_records::HandRecord;
    use pkt_records::Owner;
    use pkt_records::PlayerAction;
    use pkt_records::QueueStatus;
    use pkt_store::Memory;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport fake that replays a script of outcomes, then succeeds.
    struct Script(Mutex<VecDeque<Result<(), DeliveryError>>>);

    impl Script {
        fn of<I>(outcomes: I) -> Self
        where
            I: IntoIterator<Item = Result<(), DeliveryError>>,
        {
            Self(Mutex::new(outcomes.into_iter().collect()))
        }
    }

    impl Delivery for Script {
        async fn deliver(&self, _: &pkt_records::HandRecord) -> Result<(), DeliveryError> {
            self.0.lock().expect("script lock").pop_front().unwrap_or(Ok(()))
        }
    }

    /// Transport fake that never answers; only the attempt timeout saves us.
    struct Hang;

    impl Delivery for Hang {
        async fn deliver(&self, _: &pkt_records::HandRecord) -> Result<(), DeliveryError> {
            std::future::pending().await
        }
    }

    /// Store wrapper whose queue write-backs fail for one marked hand.
    struct Faulty {
        store: Memory,
        cursed: ID<HandRecord>,
    }

    impl HandRepository for Faulty {
        async fn create(
            &self,
            owner: ID<Owner>,
            draft: HandDraft,
        ) -> Result<HandRecord, RecordError> {
            self.store.create(owner, draft).await
        }
        async fn get(
            &self,
            id: ID<HandRecord>,
            owner: ID<Owner>,
        ) -> Result<HandRecord, RecordError> {
            self.store.get(id, owner).await
        }
        async fn list(&self, owner: ID<Owner>) -> Result<Vec<HandRecord>, RecordError> {
            self.store.list(owner).await
        }
        async fn update(
            &self,
            id: ID<HandRecord>,
            owner: ID<Owner>,
            draft: HandDraft,
        ) -> Result<HandRecord, RecordError> {
            self.store.update(id, owner, draft).await
        }
        async fn delete(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<(), RecordError> {
            self.store.delete(id, owner).await
        }
        async fn load(&self, id: ID<HandRecord>) -> Result<Option<HandRecord>, RecordError> {
            self.store.load(id).await
        }
        async fn set_sync(&self, id: ID<HandRecord>, sync: SyncStatus) -> Result<(), RecordError> {
            self.store.set_sync(id, sync).await
        }
    }

    impl SyncRepository for Faulty {
        async fn enqueue(&self, hand: ID<HandRecord>) -> Result<SyncItem, RecordError> {
            self.store.enqueue(hand).await
        }
        async fn claim(
            &self,
            limit: usize,
            max_retries: u32,
        ) -> Result<Vec<SyncItem>, RecordError> {
            self.store.claim(limit, max_retries).await
        }
        async fn complete(
            &self,
            item: ID<SyncItem>,
            error: Option<&str>,
        ) -> Result<(), RecordError> {
            if self.store.item(item).is_some_and(|i| i.hand() == self.cursed) {
                return Err(RecordError::Validation("store write refused".into()));
            }
            self.store.complete(item, error).await
        }
        async fn fail(&self, item: ID<SyncItem>, error: &str) -> Result<(), RecordError> {
            self.store.fail(item, error).await
        }
        async fn dead_letters(&self, max_retries: u32) -> Result<Vec<SyncItem>, RecordError> {
            self.store.dead_letters(max_retries).await
        }
        async fn recover(&self, liveness: Duration) -> Result<u64, RecordError> {
            self.store.recover(liveness).await
        }
        async fn purge(&self, hand: ID<HandRecord>) -> Result<u64, RecordError> {
            self.store.purge(hand).await
        }
    }

    fn draft() -> HandDraft {
        HandDraft {
            seat: Seat::CO,
            hole: Card::parse("JhJs").unwrap(),
            board: Card::parse("2d7c9h").unwrap(),
            actions: vec![
                PlayerAction::new(Stage::Pref, Action::Raise(2.5), 0),
                PlayerAction::new(Stage::Flop, Action::Bet(4.0), 1),
            ],
            result: 6.5,
            notes: None,
        }
    }

    #[tokio::test]
    async fn delivered_hand_ends_synced() {
        let store = Memory::default();
        let hand = store.create(ID::default(), draft()).await.unwrap();
        let worker = Worker::new(store.clone(), Script::of([]));
        assert_eq!(worker.cycle().await.unwrap(), 1);
        let hand = store.load(hand.id()).await.unwrap().unwrap();
        assert_eq!(hand.sync(), SyncStatus::Synced);
        let item = &store.items_for(hand.id())[0];
        assert_eq!(item.status(), QueueStatus::Completed);
        assert!(item.completed_at().is_some());
        assert!(item.error().is_none());
    }

    #[tokio::test]
    async fn retryable_failure_requeues_then_lands() {
        let store = Memory::default();
        let hand = store.create(ID::default(), draft()).await.unwrap();
        let script = Script::of([Err(DeliveryError::Retryable("503".into()))]);
        let worker = Worker::new(store.clone(), script);
        worker.cycle().await.unwrap();
        let item = &store.items_for(hand.id())[0];
        assert_eq!(item.status(), QueueStatus::Failed);
        assert_eq!(item.retries(), 1);
        assert_eq!(
            store.load(hand.id()).await.unwrap().unwrap().sync(),
            SyncStatus::Failed
        );
        // next cycle reclaims the failed item and the script now succeeds
        worker.cycle().await.unwrap();
        assert_eq!(
            store.load(hand.id()).await.unwrap().unwrap().sync(),
            SyncStatus::Synced
        );
    }

    #[tokio::test]
    async fn fatal_failure_completes_with_error_and_never_retries() {
        let store = Memory::default();
        let hand = store.create(ID::default(), draft()).await.unwrap();
        let script = Script::of([Err(DeliveryError::Fatal("malformed payload".into()))]);
        let worker = Worker::new(store.clone(), script);
        assert_eq!(worker.cycle().await.unwrap(), 1);
        let item = &store.items_for(hand.id())[0];
        assert_eq!(item.status(), QueueStatus::Completed);
        assert_eq!(item.error(), Some("malformed payload"));
        assert_eq!(item.retries(), 0);
        assert_eq!(
            store.load(hand.id()).await.unwrap().unwrap().sync(),
            SyncStatus::Failed
        );
        // completed-with-error means nothing left to claim
        assert_eq!(worker.cycle().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn retry_budget_exhausts_into_dead_letters() {
        let store = Memory::default();
        let hand = store.create(ID::default(), draft()).await.unwrap();
        let script = Script::of(std::iter::repeat_n(
            Err(DeliveryError::Retryable("connection refused".into())),
            3,
        ));
        let worker = Worker::new(store.clone(), script).max_retries(3);
        for _ in 0..3 {
            assert_eq!(worker.cycle().await.unwrap(), 1);
        }
        assert_eq!(worker.cycle().await.unwrap(), 0);
        let dead = store.dead_letters(3).await.unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].hand(), hand.id());
        assert_eq!(dead[0].error(), Some("connection refused"));
    }

    #[tokio::test]
    async fn orphaned_item_fails_without_aborting_batch() {
        let store = Memory::default();
        let survivor = store.create(ID::default(), draft()).await.unwrap();
        // an obligation whose hand never existed, as after a deletion race
        let orphan = store.enqueue(ID::default()).await.unwrap();
        let worker = Worker::new(store.clone(), Script::of([]));
        assert_eq!(worker.cycle().await.unwrap(), 2);
        let orphan = store.item(orphan.id()).unwrap();
        assert_eq!(orphan.status(), QueueStatus::Failed);
        assert_eq!(orphan.error(), Some("hand deleted"));
        assert_eq!(
            store.load(survivor.id()).await.unwrap().unwrap().sync(),
            SyncStatus::Synced
        );
    }

    #[tokio::test]
    async fn hung_transport_counts_as_retryable() {
        let store = Memory::default();
        let hand = store.create(ID::default(), draft()).await.unwrap();
        let worker = Worker::new(store.clone(), Hang).attempt(Duration::from_millis(10));
        worker.cycle().await.unwrap();
        let item = &store.items_for(hand.id())[0];
        assert_eq!(item.status(), QueueStatus::Failed);
        assert_eq!(item.retries(), 1);
        assert!(item.error().unwrap_or_default().contains("timed out"));
    }

    #[tokio::test]
    async fn write_back_error_does_not_abandon_the_batch() {
        let store = Memory::default();
        let cursed = store.create(ID::default(), draft()).await.unwrap();
        let healthy = store.create(ID::default(), draft()).await.unwrap();
        let faulty = Faulty {
            store: store.clone(),
            cursed: cursed.id(),
        };
        let worker = Worker::new(faulty, Script::of([]));
        // the first item's completion errors; the second must still land
        assert_eq!(worker.cycle().await.unwrap(), 2);
        assert_eq!(
            store.load(healthy.id()).await.unwrap().unwrap().sync(),
            SyncStatus::Synced
        );
    }

    #[tokio::test]
    async fn startup_recovery_reopens_stale_claims() {
        let store = Memory::default();
        store.create(ID::default(), draft()).await.unwrap();
        // a sibling claimed the item and died
        assert_eq!(store.claim(10, 3).await.unwrap().len(), 1);
        let worker = Worker::new(store.clone(), Script::of([])).liveness(Duration::ZERO);
        assert_eq!(worker.recover().await.unwrap(), 1);
        assert_eq!(worker.cycle().await.unwrap(), 1);
    }
}
