use super::HandRecord;
use pkt_core::Chips;
use pkt_gameplay::Seat;

/// Aggregate rollup over a list of hands, computed purely in memory.
///
/// Feeds the dashboard: overall profit and win rate plus a per-position
/// breakdown. Win rate counts strictly profitable hands only; break-even
/// hands count toward neither side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hands: usize,
    pub winners: usize,
    pub losers: usize,
    pub net: Chips,
}

impl Stats {
    /// Tallies every hand in the slice.
    pub fn tally(hands: &[HandRecord]) -> Self {
        hands.iter().fold(Self::default(), |mut stats, hand| {
            stats.hands += 1;
            stats.net += hand.result();
            if hand.result() > 0.0 {
                stats.winners += 1;
            } else if hand.result() < 0.0 {
                stats.losers += 1;
            }
            stats
        })
    }
    /// Tallies only the hands recorded from one position.
    pub fn at(hands: &[HandRecord], seat: Seat) -> Self {
        let filtered = hands
            .iter()
            .filter(|h| h.seat() == seat)
            .cloned()
            .collect::<Vec<_>>();
        Self::tally(&filtered)
    }
    /// Fraction of hands that finished strictly profitable, 0 when empty.
    pub fn winrate(&self) -> f64 {
        match self.hands {
            0 => 0.0,
            n => self.winners as f64 / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandDraft;
    use pkt_core::ID;

    fn hand(seat: Seat, result: Chips) -> HandRecord {
        HandRecord::create(
            ID::default(),
            HandDraft {
                seat,
                hole: vec![],
                board: vec![],
                actions: vec![],
                result,
                notes: None,
            },
        )
    }

    #[test]
    fn tally_splits_outcomes() {
        let hands = vec![
            hand(Seat::BTN, 10.0),
            hand(Seat::BTN, -4.0),
            hand(Seat::SB, 0.0),
        ];
        let stats = Stats::tally(&hands);
        assert_eq!(stats.hands, 3);
        assert_eq!(stats.winners, 1);
        assert_eq!(stats.losers, 1);
        assert_eq!(stats.net, 6.0);
    }

    #[test]
    fn winrate_ignores_breakeven() {
        let hands = vec![hand(Seat::BB, 2.0), hand(Seat::BB, 0.0)];
        assert_eq!(Stats::tally(&hands).winrate(), 0.5);
    }

    #[test]
    fn positional_filter() {
        let hands = vec![hand(Seat::BTN, 5.0), hand(Seat::SB, -5.0)];
        assert_eq!(Stats::at(&hands, Seat::BTN).net, 5.0);
        assert_eq!(Stats::at(&hands, Seat::SB).hands, 1);
        assert_eq!(Stats::at(&hands, Seat::UTG), Stats::default());
    }

    #[test]
    fn empty_winrate_is_zero() {
        assert_eq!(Stats::default().winrate(), 0.0);
    }
}
