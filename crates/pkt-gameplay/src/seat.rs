/// The recording player's position at the table.
///
/// Positions are labels on the stored hand, used for filtering and the
/// per-position profit breakdown; they carry no accounting behavior.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Seat {
    SB,
    BB,
    UTG,
    MP,
    HJ,
    CO,
    #[default]
    BTN,
}

impl Seat {
    /// All seven positions in order of action preflop.
    pub const fn all() -> [Self; 7] {
        [
            Self::UTG,
            Self::MP,
            Self::HJ,
            Self::CO,
            Self::BTN,
            Self::SB,
            Self::BB,
        ]
    }
}

/// str isomorphism
impl TryFrom<&str> for Seat {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "SB" => Ok(Self::SB),
            "BB" => Ok(Self::BB),
            "UTG" => Ok(Self::UTG),
            "MP" => Ok(Self::MP),
            "HJ" => Ok(Self::HJ),
            "CO" => Ok(Self::CO),
            "BTN" => Ok(Self::BTN),
            _ => Err(format!("invalid seat str: {}", s)),
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SB => write!(f, "SB"),
            Self::BB => write!(f, "BB"),
            Self::UTG => write!(f, "UTG"),
            Self::MP => write!(f, "MP"),
            Self::HJ => write!(f, "HJ"),
            Self::CO => write!(f, "CO"),
            Self::BTN => write!(f, "BTN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for seat in Seat::all() {
            assert_eq!(Ok(seat), Seat::try_from(seat.to_string().as_str()));
        }
    }
}
