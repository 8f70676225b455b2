use super::Action;
use super::Stage;
use pkt_core::BLINDS;
use pkt_core::Chips;

/// Why an action was rejected against the current betting state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountingError {
    #[error("cannot check facing a bet of {0}")]
    CheckFacingBet(Chips),
    #[error("nothing to call")]
    NothingToCall,
    #[error("facing a bet of {0}, raise instead of betting")]
    BetFacingBet(Chips),
    #[error("amount {amount} must exceed the bet to call {to_call}")]
    TooSmall { amount: Chips, to_call: Chips },
    #[error("amount {amount} exceeds remaining stack {stack}")]
    OverStack { amount: Chips, stack: Chips },
}

/// Running pot state derived from an ordered action log.
///
/// Pure fold over the log: the same sequence always derives the same state,
/// so live entry and after-the-fact re-rendering of a stored hand agree.
/// The pot opens at the posted blinds; the bet to call opens at zero and
/// re-opens at zero whenever the stage advances — the previous street's
/// price never carries over into a new betting round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accounting {
    stage: Stage,
    to_call: Chips,
    pot: Chips,
}

impl Default for Accounting {
    fn default() -> Self {
        Self {
            stage: Stage::Pref,
            to_call: 0.0,
            pot: BLINDS,
        }
    }
}

impl Accounting {
    /// Current betting round.
    pub fn stage(&self) -> Stage {
        self.stage
    }
    /// Outstanding amount a player must match to stay in the hand.
    pub fn to_call(&self) -> Chips {
        self.to_call
    }
    /// Total chips in the middle, blinds included.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// Derives the terminal state of an ordered (stage, action) log.
    pub fn replay<'a, I>(log: I) -> Self
    where
        I: IntoIterator<Item = &'a (Stage, Action)>,
    {
        log.into_iter()
            .fold(Self::default(), |mut state, (stage, action)| {
                state.apply(*stage, action);
                state
            })
    }

    /// Folds one action into the running state.
    ///
    /// An action recorded on a later stage first advances the round, which
    /// zeroes the bet to call. Calls credit the pot at the current bet to
    /// call regardless of the amount recorded on the action.
    pub fn apply(&mut self, stage: Stage, action: &Action) {
        if stage > self.stage {
            self.stage = stage;
            self.to_call = 0.0;
        }
        match *action {
            Action::Bet(amount) | Action::Raise(amount) | Action::Shove(amount) => {
                self.to_call = amount;
                self.pot += amount;
            }
            Action::Call(_) => {
                self.pot += self.to_call;
            }
            Action::Check | Action::Fold => {}
        }
    }

    /// Advances the betting round to the floor implied by the community-card
    /// count. Moving forward opens a fresh round: the bet to call resets to
    /// zero no matter how the previous street ended.
    pub fn advance(&mut self, board: usize) {
        let floor = Stage::from_board(board);
        if floor > self.stage {
            self.stage = floor;
            self.to_call = 0.0;
        }
    }

    /// Gates a new action against the current state before it is recorded.
    ///
    /// Folds are always legal. Shoves are always legal because their amount
    /// is clamped to the stack at construction (see [`Action::allin`]).
    pub fn validate(&self, action: &Action, stack: Chips) -> Result<(), AccountingError> {
        match *action {
            Action::Fold | Action::Shove(_) => Ok(()),
            Action::Check if self.to_call > 0.0 => Err(AccountingError::CheckFacingBet(self.to_call)),
            Action::Check => Ok(()),
            Action::Call(_) if self.to_call == 0.0 => Err(AccountingError::NothingToCall),
            Action::Call(_) => Ok(()),
            Action::Bet(_) if self.to_call > 0.0 => Err(AccountingError::BetFacingBet(self.to_call)),
            Action::Bet(amount) | Action::Raise(amount) => {
                if amount <= self.to_call {
                    Err(AccountingError::TooSmall {
                        amount,
                        to_call: self.to_call,
                    })
                } else if amount > stack {
                    Err(AccountingError::OverStack { amount, stack })
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_core::STACK;

    #[test]
    fn opens_at_blinds() {
        let state = Accounting::default();
        assert_eq!(state.pot(), 1.5);
        assert_eq!(state.to_call(), 0.0);
        assert_eq!(state.stage(), Stage::Pref);
    }

    #[test]
    fn bet_then_call_accounts_both_sides() {
        let log = vec![
            (Stage::Pref, Action::Bet(10.0)),
            (Stage::Pref, Action::Call(10.0)),
        ];
        let state = Accounting::replay(&log);
        assert_eq!(state.pot(), 21.5);
        assert_eq!(state.to_call(), 10.0);
    }

    #[test]
    fn call_credits_current_price_not_recorded_amount() {
        // A stale recorded amount must not leak into the pot.
        let log = vec![
            (Stage::Pref, Action::Bet(10.0)),
            (Stage::Pref, Action::Call(999.0)),
        ];
        assert_eq!(Accounting::replay(&log).pot(), 21.5);
    }

    #[test]
    fn replay_is_deterministic() {
        let log = vec![
            (Stage::Pref, Action::Raise(3.0)),
            (Stage::Pref, Action::Call(3.0)),
            (Stage::Flop, Action::Bet(5.0)),
            (Stage::Flop, Action::Call(5.0)),
        ];
        assert_eq!(Accounting::replay(&log), Accounting::replay(&log));
    }

    #[test]
    fn stage_advance_resets_to_call() {
        let log = vec![
            (Stage::Pref, Action::Bet(10.0)),
            (Stage::Pref, Action::Call(10.0)),
        ];
        let mut state = Accounting::replay(&log);
        assert_eq!(state.to_call(), 10.0);
        state.advance(3);
        assert_eq!(state.stage(), Stage::Flop);
        assert_eq!(state.to_call(), 0.0);
        assert_eq!(state.pot(), 21.5);
    }

    #[test]
    fn advance_never_regresses() {
        let mut state = Accounting::default();
        state.advance(5);
        assert_eq!(state.stage(), Stage::Rive);
        state.advance(3);
        assert_eq!(state.stage(), Stage::Rive);
    }

    #[test]
    fn later_stage_action_opens_fresh_round() {
        let log = vec![
            (Stage::Pref, Action::Bet(10.0)),
            (Stage::Flop, Action::Check),
        ];
        let state = Accounting::replay(&log);
        assert_eq!(state.stage(), Stage::Flop);
        assert_eq!(state.to_call(), 0.0);
    }

    #[test]
    fn rejects_check_facing_bet() {
        let mut state = Accounting::default();
        state.apply(Stage::Pref, &Action::Bet(10.0));
        assert_eq!(
            state.validate(&Action::Check, STACK),
            Err(AccountingError::CheckFacingBet(10.0))
        );
    }

    #[test]
    fn rejects_call_of_nothing() {
        let state = Accounting::default();
        assert_eq!(
            state.validate(&Action::Call(0.0), STACK),
            Err(AccountingError::NothingToCall)
        );
    }

    #[test]
    fn rejects_bet_facing_bet() {
        let mut state = Accounting::default();
        state.apply(Stage::Pref, &Action::Bet(4.0));
        assert!(matches!(
            state.validate(&Action::Bet(8.0), STACK),
            Err(AccountingError::BetFacingBet(_))
        ));
    }

    #[test]
    fn rejects_undersized_raise() {
        let mut state = Accounting::default();
        state.apply(Stage::Pref, &Action::Bet(10.0));
        assert!(matches!(
            state.validate(&Action::Raise(10.0), STACK),
            Err(AccountingError::TooSmall { .. })
        ));
        assert!(state.validate(&Action::Raise(20.0), STACK).is_ok());
    }

    #[test]
    fn rejects_bet_over_stack() {
        let state = Accounting::default();
        assert!(matches!(
            state.validate(&Action::Bet(150.0), STACK),
            Err(AccountingError::OverStack { .. })
        ));
    }

    #[test]
    fn fold_and_shove_always_legal() {
        let mut state = Accounting::default();
        state.apply(Stage::Pref, &Action::Bet(10.0));
        assert!(state.validate(&Action::Fold, STACK).is_ok());
        assert!(state.validate(&Action::allin(500.0, STACK), STACK).is_ok());
    }

    #[test]
    fn shove_sets_the_price() {
        let mut state = Accounting::default();
        state.apply(Stage::Pref, &Action::allin(500.0, STACK));
        assert_eq!(state.to_call(), STACK);
        assert_eq!(state.pot(), 1.5 + STACK);
    }
}
