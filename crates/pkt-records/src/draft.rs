use super::PlayerAction;
use super::RecordError;
use pkt_cards::Card;
use pkt_core::BOARD_MAX;
use pkt_core::Chips;
use pkt_core::HOLE_MAX;
use pkt_gameplay::Seat;
use pkt_gameplay::Stage;

/// Caller-supplied fields for creating or updating a hand.
///
/// Updates replace the mutable fields wholesale — partial action edits are
/// not supported, the action list is deleted and reinserted as given.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct HandDraft {
    pub seat: Seat,
    pub hole: Vec<Card>,
    pub board: Vec<Card>,
    pub actions: Vec<PlayerAction>,
    pub result: Chips,
    pub notes: Option<String>,
}

impl HandDraft {
    /// Checks the structural invariants before any persistence happens.
    ///
    /// - at most two hole cards and five board cards
    /// - action orders strictly ascending
    /// - action stages non-decreasing and within the board's stage floor
    /// - betting amounts positive where the action kind requires one
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.hole.len() > HOLE_MAX {
            return Err(RecordError::Validation(format!(
                "at most {} hole cards, got {}",
                HOLE_MAX,
                self.hole.len()
            )));
        }
        if self.board.len() > BOARD_MAX {
            return Err(RecordError::Validation(format!(
                "at most {} community cards, got {}",
                BOARD_MAX,
                self.board.len()
            )));
        }
        let ceiling = Stage::from_board(self.board.len());
        let mut last_order = None;
        let mut last_stage = Stage::Pref;
        for play in &self.actions {
            if last_order.is_some_and(|prev| play.order() <= prev) {
                return Err(RecordError::Validation(format!(
                    "action orders must ascend, got {} after {}",
                    play.order(),
                    last_order.unwrap_or_default()
                )));
            }
            if play.stage() < last_stage {
                return Err(RecordError::Validation(format!(
                    "stage {} cannot follow {}",
                    play.stage(),
                    last_stage
                )));
            }
            if play.stage() > ceiling {
                return Err(RecordError::Validation(format!(
                    "stage {} unreachable with {} board cards",
                    play.stage(),
                    self.board.len()
                )));
            }
            if play.action().is_aggro() && play.action().amount().is_some_and(|a| a <= 0.0) {
                return Err(RecordError::Validation(format!(
                    "{} requires a positive amount",
                    play.action().kind()
                )));
            }
            last_order = Some(play.order());
            last_stage = play.stage();
        }
        Ok(())
    }
}
