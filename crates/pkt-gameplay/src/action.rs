use pkt_core::Chips;

/// A player decision during a betting round.
///
/// Betting actions carry a chip amount in big blinds: for [`Action::Bet`] and
/// [`Action::Raise`] the amount wagered, for [`Action::Shove`] the stack that
/// went in, for [`Action::Call`] the bet that was matched at recording time.
/// Accounting always credits a call at the *current* bet-to-call, so the
/// recorded call amount is display metadata, not an input to the pot.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    Shove(Chips),
}

impl Action {
    /// True if this is a bet, raise, or shove (puts a new price on the pot).
    pub fn is_aggro(&self) -> bool {
        matches!(self, Action::Bet(_) | Action::Raise(_) | Action::Shove(_))
    }
    /// True if this is a fold or check (no chips added).
    pub fn is_passive(&self) -> bool {
        matches!(self, Action::Fold | Action::Check)
    }
    /// Extracts the chip amount from betting actions.
    pub fn amount(&self) -> Option<Chips> {
        match *self {
            Action::Call(amount)
            | Action::Bet(amount)
            | Action::Raise(amount)
            | Action::Shove(amount) => Some(amount),
            _ => None,
        }
    }
    /// Lowercase kind tag, the persisted discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call(_) => "call",
            Action::Bet(_) => "bet",
            Action::Raise(_) => "raise",
            Action::Shove(_) => "all-in",
        }
    }
    /// An all-in for `amount`, clamped to the chips actually behind.
    pub fn allin(amount: Chips, stack: Chips) -> Self {
        Action::Shove(amount.min(stack))
    }
}

/// (kind, amount) isomorphism, the persisted column pair.
impl TryFrom<(&str, Option<Chips>)> for Action {
    type Error = String;
    fn try_from((kind, amount): (&str, Option<Chips>)) -> Result<Self, Self::Error> {
        match (kind.trim().to_lowercase().as_str(), amount) {
            ("fold", None) => Ok(Action::Fold),
            ("check", None) => Ok(Action::Check),
            ("call", Some(n)) => Ok(Action::Call(n)),
            ("bet", Some(n)) => Ok(Action::Bet(n)),
            ("raise", Some(n)) => Ok(Action::Raise(n)),
            ("all-in", Some(n)) => Ok(Action::Shove(n)),
            ("fold" | "check", Some(_)) => Err(format!("{} carries no amount", kind)),
            (k, None) => Err(format!("{} requires an amount", k)),
            (k, Some(_)) => Err(format!("unknown action kind: {}", k)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.amount() {
            Some(n) => write!(f, "{} {}", self.kind(), n),
            None => write!(f, "{}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_amount_round_trips() {
        for action in [
            Action::Fold,
            Action::Check,
            Action::Call(2.0),
            Action::Bet(3.5),
            Action::Raise(10.0),
            Action::Shove(98.5),
        ] {
            let kind = action.kind();
            let amount = action.amount();
            assert_eq!(Ok(action), Action::try_from((kind, amount)));
        }
    }

    #[test]
    fn rejects_mismatched_amounts() {
        assert!(Action::try_from(("fold", Some(1.0))).is_err());
        assert!(Action::try_from(("bet", None)).is_err());
        assert!(Action::try_from(("limp", Some(1.0))).is_err());
    }

    #[test]
    fn allin_clamps_to_stack() {
        assert_eq!(Action::allin(150.0, 100.0), Action::Shove(100.0));
        assert_eq!(Action::allin(40.0, 100.0), Action::Shove(40.0));
    }
}
