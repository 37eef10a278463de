pub mod bet;
pub mod play;

pub use bet::BetUnits;
pub use play::{Action, recommend_action};

use crate::model::rank::Rank;
use serde::Serialize;

/// What to bet and how to play the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub bet_units: BetUnits,
    pub action: Action,
}

impl Decision {
    pub fn decide(player_total: u8, dealer_up: Rank, true_count: f64) -> Self {
        Self {
            bet_units: BetUnits::from_true_count(true_count),
            action: recommend_action(player_total, dealer_up.points(), true_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_up_counts_as_eleven() {
        let decision = Decision::decide(10, Rank::Ace, 3.0);
        assert_eq!(decision.action, Action::Hit);
        assert_eq!(decision.bet_units, BetUnits::Two);
    }

    #[test]
    fn face_up_counts_as_ten() {
        let decision = Decision::decide(10, Rank::King, 5.5);
        assert_eq!(decision.action, Action::Hit);
        assert_eq!(decision.bet_units, BetUnits::Five);
        assert_eq!(Decision::decide(10, Rank::Nine, 5.5).action, Action::DoubleDown);
    }

    #[test]
    fn serializes_for_reports() {
        let decision = Decision::decide(18, Rank::Six, 0.0);
        let json = serde_json::to_string(&decision).expect("serialize");
        assert_eq!(json, r#"{"bet_units":1,"action":"stand"}"#);
    }
}
