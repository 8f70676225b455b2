/// The four betting rounds in Texas Hold'em.
///
/// A hand's stage is driven by its community cards, not by the action log:
/// revealing the 3rd, 4th, and 5th board card advances play to the flop,
/// turn, and river respectively. Each new stage opens a fresh betting round.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    #[default]
    Pref = 0,
    Flop = 1,
    Turn = 2,
    Rive = 3,
}

impl Stage {
    /// All four stages in order.
    pub const fn all() -> [Self; 4] {
        [Self::Pref, Self::Flop, Self::Turn, Self::Rive]
    }
    /// The stage floor implied by a community-card count.
    /// 0-2 cards is still preflop; 3, 4, 5 open the flop, turn, river.
    pub const fn from_board(n: usize) -> Self {
        match n {
            0..=2 => Self::Pref,
            3 => Self::Flop,
            4 => Self::Turn,
            _ => Self::Rive,
        }
    }
    /// Human-readable name.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pref => "Preflop",
            Self::Flop => "Flop",
            Self::Turn => "Turn",
            Self::Rive => "River",
        }
    }
}

/// str isomorphism
impl TryFrom<&str> for Stage {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "preflop" => Ok(Self::Pref),
            "flop" => Ok(Self::Flop),
            "turn" => Ok(Self::Turn),
            "river" => Ok(Self::Rive),
            _ => Err(format!("invalid stage str: {}", s)),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pref => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::Rive => write!(f, "river"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_count_floors_stage() {
        assert_eq!(Stage::from_board(0), Stage::Pref);
        assert_eq!(Stage::from_board(2), Stage::Pref);
        assert_eq!(Stage::from_board(3), Stage::Flop);
        assert_eq!(Stage::from_board(4), Stage::Turn);
        assert_eq!(Stage::from_board(5), Stage::Rive);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Pref < Stage::Flop);
        assert!(Stage::Turn < Stage::Rive);
    }

    #[test]
    fn bijective_str() {
        for stage in Stage::all() {
            assert_eq!(Ok(stage), Stage::try_from(stage.to_string().as_str()));
        }
    }
}
