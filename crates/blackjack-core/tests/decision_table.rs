use blackjack_core::count::{CountState, DecksRemaining};
use blackjack_core::model::hand::ResolvedHand;
use blackjack_core::model::rank::Rank;
use blackjack_core::strategy::{Action, BetUnits, Decision, recommend_action};

fn hand(ranks: &[Rank]) -> ResolvedHand {
    ranks.iter().copied().collect()
}

#[test]
fn hi_lo_covers_every_rank() {
    let plus: Vec<_> = Rank::ORDERED.iter().filter(|r| r.hi_lo() == 1).collect();
    let zero: Vec<_> = Rank::ORDERED.iter().filter(|r| r.hi_lo() == 0).collect();
    let minus: Vec<_> = Rank::ORDERED.iter().filter(|r| r.hi_lo() == -1).collect();
    assert_eq!(plus.len(), 5);
    assert_eq!(zero.len(), 3);
    assert_eq!(minus.len(), 5);
    for face in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace] {
        assert_eq!(face.hi_lo(), -1, "{face}");
    }
}

#[test]
fn twelve_against_six_stands_but_against_seven_hits() {
    assert_eq!(recommend_action(12, 6, 0.0), Action::Stand);
    assert_eq!(recommend_action(12, 7, 0.0), Action::Hit);
    assert_eq!(recommend_action(12, 7, 4.0), Action::Hit);
}

#[test]
fn precedence_lets_thirteen_rule_win_before_twelve_rule() {
    // Thirteen against a three stands via the broad stiff-hand rule.
    assert_eq!(recommend_action(13, 3, 0.0), Action::Stand);
    // Twelve against a three is not covered by any stand rule.
    assert_eq!(recommend_action(12, 3, 0.0), Action::Hit);
}

#[test]
fn sixteen_against_nine_hits_with_count_unchanged() {
    let decks = DecksRemaining::new(2.0).expect("decks");
    let mut state = CountState::with_running_count(2, decks);
    let player = hand(&[Rank::Ten, Rank::Six]);
    let dealer = hand(&[Rank::Nine]);
    let up = dealer.up_card().expect("dealer card");

    state.observe_all(player.iter());
    state.observe(up);

    assert_eq!(player.total(), 16);
    assert_eq!(state.running_count(), 2);
    assert_eq!(state.true_count(), 1.0);

    let decision = Decision::decide(player.total(), up, state.true_count());
    assert_eq!(decision.action, Action::Hit);
    assert_eq!(decision.bet_units, BetUnits::One);
}
