use super::HandDraft;
use super::Owner;
use super::PlayerAction;
use super::SyncStatus;
use pkt_cards::Card;
use pkt_core::Chips;
use pkt_core::ID;
use pkt_core::Unique;
use pkt_gameplay::Accounting;
use pkt_gameplay::Seat;
use std::time::SystemTime;

/// A recorded poker hand: cards, position, ordered actions, and outcome.
///
/// The single source of truth for a tracked session. Cards are opaque data
/// here — no strength evaluation happens anywhere in the workspace. Pot and
/// bet-to-call are never stored; they re-derive from the action log via
/// [`accounting`](Self::accounting) so display always agrees with entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HandRecord {
    id: ID<Self>,
    owner: ID<Owner>,
    created_at: SystemTime,
    updated_at: SystemTime,
    seat: Seat,
    hole: Vec<Card>,
    board: Vec<Card>,
    actions: Vec<PlayerAction>,
    result: Chips,
    notes: Option<String>,
    sync: SyncStatus,
}

impl HandRecord {
    /// Materializes a validated draft into a fresh record.
    pub fn create(owner: ID<Owner>, draft: HandDraft) -> Self {
        let now = SystemTime::now();
        Self {
            id: ID::default(),
            owner,
            created_at: now,
            updated_at: now,
            seat: draft.seat,
            hole: draft.hole,
            board: draft.board,
            actions: draft.actions,
            result: draft.result,
            notes: draft.notes,
            sync: SyncStatus::Pending,
        }
    }
    /// Overwrites the mutable fields from a validated draft, bumps
    /// `updated_at`, and resets sync state — every local edit must
    /// propagate externally again.
    pub fn revise(&mut self, draft: HandDraft) {
        self.seat = draft.seat;
        self.hole = draft.hole;
        self.board = draft.board;
        self.actions = draft.actions;
        self.result = draft.result;
        self.notes = draft.notes;
        self.sync = SyncStatus::Pending;
        self.updated_at = SystemTime::now();
    }
    /// Reconstructs a record from its persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn hydrate(
        id: ID<Self>,
        owner: ID<Owner>,
        created_at: SystemTime,
        updated_at: SystemTime,
        seat: Seat,
        hole: Vec<Card>,
        board: Vec<Card>,
        actions: Vec<PlayerAction>,
        result: Chips,
        notes: Option<String>,
        sync: SyncStatus,
    ) -> Self {
        Self {
            id,
            owner,
            created_at,
            updated_at,
            seat,
            hole,
            board,
            actions,
            result,
            notes,
            sync,
        }
    }

    pub fn owner(&self) -> ID<Owner> {
        self.owner
    }
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
    pub fn updated_at(&self) -> SystemTime {
        self.updated_at
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn hole(&self) -> &[Card] {
        &self.hole
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn actions(&self) -> &[PlayerAction] {
        &self.actions
    }
    pub fn result(&self) -> Chips {
        self.result
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn sync(&self) -> SyncStatus {
        self.sync
    }
    pub fn set_sync(&mut self, sync: SyncStatus) {
        self.sync = sync;
    }

    /// Re-derives pot, bet-to-call, and stage from the stored action log,
    /// then floors the stage by the community cards on board.
    pub fn accounting(&self) -> Accounting {
        let log = self
            .actions
            .iter()
            .map(PlayerAction::entry)
            .collect::<Vec<_>>();
        let mut state = Accounting::replay(&log);
        state.advance(self.board.len());
        state
    }
}

impl Unique for HandRecord {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use pkt_pg::*;

    /// Hole and board cards persist in the concatenated two-character
    /// notation ("AsKd"); actions live in their own table keyed by hand.
    impl Schema for HandRecord {
        fn name() -> &'static str {
            HANDS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                HANDS,
                " (
                    id          UUID PRIMARY KEY,
                    owner_id    UUID NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL,
                    updated_at  TIMESTAMPTZ NOT NULL,
                    seat        TEXT NOT NULL,
                    hole        TEXT NOT NULL,
                    board       TEXT NOT NULL,
                    result      DOUBLE PRECISION NOT NULL,
                    notes       TEXT,
                    sync        TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_hands_owner ON ",
                HANDS,
                " (owner_id, created_at DESC);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_gameplay::Action;
    use pkt_gameplay::Stage;

    fn draft() -> HandDraft {
        HandDraft {
            seat: Seat::BTN,
            hole: Card::parse("AsKd").unwrap(),
            board: Card::parse("2c7h9s").unwrap(),
            actions: vec![
                PlayerAction::new(Stage::Pref, Action::Raise(3.0), 0),
                PlayerAction::new(Stage::Pref, Action::Call(3.0), 1),
                PlayerAction::new(Stage::Flop, Action::Bet(5.0), 2),
            ],
            result: 4.5,
            notes: None,
        }
    }

    #[test]
    fn create_stamps_identity_and_pending_sync() {
        let hand = HandRecord::create(ID::default(), draft());
        assert_eq!(hand.sync(), SyncStatus::Pending);
        assert_eq!(hand.created_at(), hand.updated_at());
        assert_eq!(hand.actions().len(), 3);
    }

    #[test]
    fn revise_resets_sync_and_bumps_updated() {
        let mut hand = HandRecord::create(ID::default(), draft());
        hand.set_sync(SyncStatus::Synced);
        hand.revise(draft());
        assert_eq!(hand.sync(), SyncStatus::Pending);
        assert!(hand.updated_at() >= hand.created_at());
    }

    #[test]
    fn accounting_rederives_from_log() {
        let hand = HandRecord::create(ID::default(), draft());
        let state = hand.accounting();
        // blinds 1.5 + raise 3 + call 3 + flop bet 5
        assert_eq!(state.pot(), 12.5);
        assert_eq!(state.to_call(), 5.0);
        assert_eq!(state.stage(), Stage::Flop);
    }
}
