use pkt_gameplay::Action;
use pkt_gameplay::Stage;

/// One betting decision recorded within a hand.
///
/// Immutable once recorded. `order` is the ascending sequence index unique
/// within the hand; replay and persistence both sort by it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAction {
    stage: Stage,
    action: Action,
    order: i32,
}

impl PlayerAction {
    pub fn new(stage: Stage, action: Action, order: i32) -> Self {
        Self {
            stage,
            action,
            order,
        }
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn action(&self) -> Action {
        self.action
    }
    pub fn order(&self) -> i32 {
        self.order
    }
    /// The (stage, action) pair consumed by the accounting replay.
    pub fn entry(&self) -> (Stage, Action) {
        (self.stage, self.action)
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use pkt_pg::*;

    /// Actions live and die with their hand: the foreign key cascades.
    impl Schema for PlayerAction {
        fn name() -> &'static str {
            ACTIONS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ACTIONS,
                " (
                    hand_id     UUID NOT NULL REFERENCES ",
                HANDS,
                "(id) ON DELETE CASCADE,
                    seq         INTEGER NOT NULL,
                    stage       TEXT NOT NULL,
                    kind        TEXT NOT NULL,
                    amount      DOUBLE PRECISION,
                    PRIMARY KEY (hand_id, seq)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_actions_hand ON ",
                ACTIONS,
                " (hand_id);"
            )
        }
    }
}
