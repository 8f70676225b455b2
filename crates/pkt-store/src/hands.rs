use crate::queue::insert_item;
use crate::Postgres;
use pkt_core::Chips;
use pkt_core::ID;
use pkt_core::Unique;
use pkt_cards::Card;
use pkt_gameplay::Action;
use pkt_gameplay::Seat;
use pkt_gameplay::Stage;
use pkt_pg::*;
use pkt_records::HandDraft;
use pkt_records::HandRecord;
use pkt_records::Owner;
use pkt_records::PlayerAction;
use pkt_records::RecordError;
use pkt_records::SyncItem;
use pkt_records::SyncStatus;
use std::time::SystemTime;
use tokio_postgres::GenericClient;
use tokio_postgres::Row;

/// Repository trait for hand record persistence.
///
/// All owner-scoped reads and writes collapse absence and foreign ownership
/// into [`RecordError::NotFound`]; only the worker-facing [`load`] and
/// [`set_sync`] bypass the owner scope.
///
/// [`load`]: HandRepository::load
/// [`set_sync`]: HandRepository::set_sync
#[allow(async_fn_in_trait)]
pub trait HandRepository {
    /// Validates the draft, persists the hand with its actions, and
    /// enqueues a pending sync item — all in one atomic unit.
    async fn create(&self, owner: ID<Owner>, draft: HandDraft) -> Result<HandRecord, RecordError>;
    /// Owner-scoped fetch with actions attached.
    async fn get(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<HandRecord, RecordError>;
    /// Every hand of one owner, newest first.
    async fn list(&self, owner: ID<Owner>) -> Result<Vec<HandRecord>, RecordError>;
    /// Overwrites mutable fields, replaces the action list wholesale,
    /// resets sync to pending, and enqueues a fresh item atomically.
    async fn update(
        &self,
        id: ID<HandRecord>,
        owner: ID<Owner>,
        draft: HandDraft,
    ) -> Result<HandRecord, RecordError>;
    /// Removes the hand, its actions, and its queue items.
    async fn delete(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<(), RecordError>;
    /// Unscoped fetch for the sync worker; `None` when the hand is gone.
    async fn load(&self, id: ID<HandRecord>) -> Result<Option<HandRecord>, RecordError>;
    /// Worker-side write-back of delivery outcome.
    async fn set_sync(&self, id: ID<HandRecord>, sync: SyncStatus) -> Result<(), RecordError>;
}

impl HandRepository for Postgres {
    async fn create(&self, owner: ID<Owner>, draft: HandDraft) -> Result<HandRecord, RecordError> {
        draft.validate()?;
        let hand = HandRecord::create(owner, draft);
        let item = SyncItem::enqueued(hand.id());
        let mut client = self.client().await;
        let tx = client.transaction().await?;
        insert_hand(&tx, &hand).await?;
        insert_actions(&tx, hand.id(), hand.actions()).await?;
        insert_item(&tx, &item).await?;
        tx.commit().await?;
        log::debug!("[store] created hand {}", hand.id());
        Ok(hand)
    }

    async fn get(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<HandRecord, RecordError> {
        let client = self.client().await;
        let row = client
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, owner_id, created_at, updated_at, seat, hole, board, result, notes, sync FROM ",
                    HANDS,
                    " WHERE id = $1 AND owner_id = $2"
                ),
                &[&id.inner(), &owner.inner()],
            )
            .await?
            .ok_or(RecordError::NotFound)?;
        let actions = fetch_actions(&*client, id).await?;
        hydrate_hand(&row, actions)
    }

    async fn list(&self, owner: ID<Owner>) -> Result<Vec<HandRecord>, RecordError> {
        let client = self.client().await;
        let rows = client
            .query(
                const_format::concatcp!(
                    "SELECT id, owner_id, created_at, updated_at, seat, hole, board, result, notes, sync FROM ",
                    HANDS,
                    " WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
                ),
                &[&owner.inner()],
            )
            .await?;
        let mut hands = Vec::with_capacity(rows.len());
        for row in rows {
            let id = ID::from(row.get::<_, uuid::Uuid>(0));
            let actions = fetch_actions(&*client, id).await?;
            hands.push(hydrate_hand(&row, actions)?);
        }
        Ok(hands)
    }

    async fn update(
        &self,
        id: ID<HandRecord>,
        owner: ID<Owner>,
        draft: HandDraft,
    ) -> Result<HandRecord, RecordError> {
        draft.validate()?;
        let mut hand = self.get(id, owner).await?;
        hand.revise(draft);
        let item = SyncItem::enqueued(id);
        let mut client = self.client().await;
        let tx = client.transaction().await?;
        let touched = tx
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    HANDS,
                    " SET updated_at = $2, seat = $3, hole = $4, board = $5,
                          result = $6, notes = $7, sync = $8
                      WHERE id = $1 AND owner_id = $9"
                ),
                &[
                    &hand.id().inner(),
                    &hand.updated_at(),
                    &hand.seat().to_string(),
                    &Card::unparse(hand.hole()),
                    &Card::unparse(hand.board()),
                    &hand.result(),
                    &hand.notes(),
                    &hand.sync().to_string(),
                    &hand.owner().inner(),
                ],
            )
            .await?;
        if touched == 0 {
            // deleted between the scoped read and the write; drop rolls back
            return Err(RecordError::NotFound);
        }
        tx.execute(
            const_format::concatcp!("DELETE FROM ", ACTIONS, " WHERE hand_id = $1"),
            &[&id.inner()],
        )
        .await?;
        insert_actions(&tx, id, hand.actions()).await?;
        insert_item(&tx, &item).await?;
        tx.commit().await?;
        log::debug!("[store] updated hand {}", id);
        Ok(hand)
    }

    async fn delete(&self, id: ID<HandRecord>, owner: ID<Owner>) -> Result<(), RecordError> {
        let mut client = self.client().await;
        let tx = client.transaction().await?;
        let touched = tx
            .execute(
                const_format::concatcp!("DELETE FROM ", HANDS, " WHERE id = $1 AND owner_id = $2"),
                &[&id.inner(), &owner.inner()],
            )
            .await?;
        if touched == 0 {
            return Err(RecordError::NotFound);
        }
        tx.execute(
            const_format::concatcp!("DELETE FROM ", SYNC_QUEUE, " WHERE hand_id = $1"),
            &[&id.inner()],
        )
        .await?;
        tx.commit().await?;
        log::debug!("[store] deleted hand {}", id);
        Ok(())
    }

    async fn load(&self, id: ID<HandRecord>) -> Result<Option<HandRecord>, RecordError> {
        let client = self.client().await;
        let row = client
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, owner_id, created_at, updated_at, seat, hole, board, result, notes, sync FROM ",
                    HANDS,
                    " WHERE id = $1"
                ),
                &[&id.inner()],
            )
            .await?;
        match row {
            None => Ok(None),
            Some(row) => {
                let actions = fetch_actions(&*client, id).await?;
                hydrate_hand(&row, actions).map(Some)
            }
        }
    }

    async fn set_sync(&self, id: ID<HandRecord>, sync: SyncStatus) -> Result<(), RecordError> {
        let client = self.client().await;
        client
            .execute(
                const_format::concatcp!("UPDATE ", HANDS, " SET sync = $2 WHERE id = $1"),
                &[&id.inner(), &sync.to_string()],
            )
            .await?;
        Ok(())
    }
}

async fn insert_hand<C>(client: &C, hand: &HandRecord) -> Result<(), PgErr>
where
    C: GenericClient,
{
    client
        .execute(
            const_format::concatcp!(
                "INSERT INTO ",
                HANDS,
                " (id, owner_id, created_at, updated_at, seat, hole, board, result, notes, sync)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
            ),
            &[
                &hand.id().inner(),
                &hand.owner().inner(),
                &hand.created_at(),
                &hand.updated_at(),
                &hand.seat().to_string(),
                &Card::unparse(hand.hole()),
                &Card::unparse(hand.board()),
                &hand.result(),
                &hand.notes(),
                &hand.sync().to_string(),
            ],
        )
        .await
        .map(|_| ())
}

async fn insert_actions<C>(
    client: &C,
    id: ID<HandRecord>,
    actions: &[PlayerAction],
) -> Result<(), PgErr>
where
    C: GenericClient,
{
    for play in actions {
        client
            .execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    ACTIONS,
                    " (hand_id, seq, stage, kind, amount) VALUES ($1, $2, $3, $4, $5)"
                ),
                &[
                    &id.inner(),
                    &play.order(),
                    &play.stage().to_string(),
                    &play.action().kind(),
                    &play.action().amount(),
                ],
            )
            .await?;
    }
    Ok(())
}

async fn fetch_actions<C>(client: &C, id: ID<HandRecord>) -> Result<Vec<PlayerAction>, RecordError>
where
    C: GenericClient,
{
    client
        .query(
            const_format::concatcp!(
                "SELECT seq, stage, kind, amount FROM ",
                ACTIONS,
                " WHERE hand_id = $1 ORDER BY seq ASC"
            ),
            &[&id.inner()],
        )
        .await?
        .iter()
        .map(hydrate_action)
        .collect()
}

fn hydrate_action(row: &Row) -> Result<PlayerAction, RecordError> {
    let seq = row.get::<_, i32>(0);
    let stage = Stage::try_from(row.get::<_, &str>(1)).map_err(RecordError::Validation)?;
    let action = Action::try_from((row.get::<_, &str>(2), row.get::<_, Option<Chips>>(3)))
        .map_err(RecordError::Validation)?;
    Ok(PlayerAction::new(stage, action, seq))
}

fn hydrate_hand(row: &Row, actions: Vec<PlayerAction>) -> Result<HandRecord, RecordError> {
    Ok(HandRecord::hydrate(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        row.get::<_, SystemTime>(2),
        row.get::<_, SystemTime>(3),
        Seat::try_from(row.get::<_, &str>(4)).map_err(RecordError::Validation)?,
        Card::parse(row.get::<_, &str>(5)).map_err(RecordError::Validation)?,
        Card::parse(row.get::<_, &str>(6)).map_err(RecordError::Validation)?,
        actions,
        row.get::<_, Chips>(7),
        row.get::<_, Option<String>>(8),
        SyncStatus::try_from(row.get::<_, &str>(9)).map_err(RecordError::Validation)?,
    ))
}
