use blackjack_core::count::CountState;
use blackjack_core::model::hand::ResolvedHand;
use blackjack_core::model::rank::Rank;
use blackjack_core::strategy::Decision;
use serde::Serialize;
use tracing::{Level, event};

use crate::error::ScanError;

/// Everything learned from one successful scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub dealer: ResolvedHand,
    pub player: ResolvedHand,
    pub up_card: Rank,
    pub player_total: u8,
    pub running_count_before: i32,
    pub running_count: i32,
    pub true_count: f64,
    pub decision: Decision,
}

/// Owns the shoe-long count and turns resolved hands into decisions.
#[derive(Debug, Clone)]
pub struct CountEngine {
    state: CountState,
}

impl CountEngine {
    pub fn new(state: CountState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CountState {
        &self.state
    }

    pub fn running_count(&self) -> i32 {
        self.state.running_count()
    }

    pub fn true_count(&self) -> f64 {
        self.state.true_count()
    }

    /// Applies a finished scan. Both hands must be non-empty; otherwise the
    /// count is left untouched and the scan is rejected.
    pub fn settle(
        &mut self,
        dealer: ResolvedHand,
        player: ResolvedHand,
    ) -> Result<ScanReport, ScanError> {
        let (Some(up_card), false) = (dealer.up_card(), player.is_empty()) else {
            return Err(ScanError::NoCardsDetected {
                dealer_empty: dealer.is_empty(),
                player_empty: player.is_empty(),
            });
        };

        let running_count_before = self.state.running_count();
        self.state.observe_all(player.iter());
        self.state.observe(up_card);

        let true_count = self.state.true_count();
        let player_total = player.total();
        let decision = Decision::decide(player_total, up_card, true_count);

        event!(
            target: "blackjack_engine::count",
            Level::INFO,
            dealer = %dealer,
            player = %player,
            up_card = %up_card,
            player_total,
            running_count_before,
            running_count = self.state.running_count(),
            true_count,
            bet_units = decision.bet_units.units(),
            action = %decision.action,
            "scan settled"
        );

        Ok(ScanReport {
            dealer,
            player,
            up_card,
            player_total,
            running_count_before,
            running_count: self.state.running_count(),
            true_count,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::count::DecksRemaining;
    use blackjack_core::strategy::{Action, BetUnits};

    fn engine(running: i32, decks: f64) -> CountEngine {
        let decks = DecksRemaining::new(decks).expect("decks");
        CountEngine::new(CountState::with_running_count(running, decks))
    }

    fn hand(ranks: &[Rank]) -> ResolvedHand {
        ranks.iter().copied().collect()
    }

    #[test]
    fn empty_dealer_leaves_count_alone() {
        let mut engine = engine(3, 2.0);
        let err = engine
            .settle(ResolvedHand::new(), hand(&[Rank::Two]))
            .expect_err("dealer missing");
        assert_eq!(
            err,
            ScanError::NoCardsDetected {
                dealer_empty: true,
                player_empty: false
            }
        );
        assert_eq!(engine.running_count(), 3);
    }

    #[test]
    fn empty_player_leaves_count_alone() {
        let mut engine = engine(-1, 1.0);
        assert!(engine.settle(hand(&[Rank::Six]), ResolvedHand::new()).is_err());
        assert_eq!(engine.running_count(), -1);
    }

    #[test]
    fn only_up_card_counts_for_dealer() {
        let mut engine = engine(0, 1.0);
        let report = engine
            .settle(hand(&[Rank::Five, Rank::Ace]), hand(&[Rank::Ten, Rank::Ten]))
            .expect("settled");
        assert_eq!(report.up_card, Rank::Five);
        assert_eq!(report.running_count, -1);
    }

    #[test]
    fn decision_uses_updated_count() {
        let mut engine = engine(3, 1.0);
        let report = engine
            .settle(hand(&[Rank::Four]), hand(&[Rank::Five, Rank::Six]))
            .expect("settled");
        assert_eq!(report.running_count_before, 3);
        assert_eq!(report.running_count, 6);
        assert_eq!(report.true_count, 6.0);
        assert_eq!(report.player_total, 11);
        assert_eq!(report.decision.bet_units, BetUnits::Five);
        assert_eq!(report.decision.action, Action::DoubleDown);
    }
}
