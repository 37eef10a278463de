use crate::model::rank::Rank;
use serde::Serialize;
use thiserror::Error;

/// Estimated decks left in the shoe. Always finite and strictly positive, so
/// the true-count division never blows up.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DecksRemaining(f64);

impl DecksRemaining {
    pub fn new(decks: f64) -> Result<Self, CountError> {
        if decks.is_finite() && decks > 0.0 {
            Ok(Self(decks))
        } else {
            Err(CountError::InvalidDecks { decks })
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Running HiLo tally for the current shoe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountState {
    running_count: i32,
    decks_remaining: DecksRemaining,
}

impl CountState {
    pub const fn new(decks_remaining: DecksRemaining) -> Self {
        Self::with_running_count(0, decks_remaining)
    }

    pub const fn with_running_count(running_count: i32, decks_remaining: DecksRemaining) -> Self {
        Self {
            running_count,
            decks_remaining,
        }
    }

    pub const fn running_count(&self) -> i32 {
        self.running_count
    }

    pub const fn decks_remaining(&self) -> DecksRemaining {
        self.decks_remaining
    }

    pub fn true_count(&self) -> f64 {
        f64::from(self.running_count) / self.decks_remaining.get()
    }

    pub fn observe(&mut self, rank: Rank) {
        self.running_count += rank.hi_lo();
    }

    pub fn observe_all<'a>(&mut self, ranks: impl IntoIterator<Item = &'a Rank>) {
        for rank in ranks {
            self.observe(*rank);
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CountError {
    #[error("decks remaining must be a positive number, got {decks}")]
    InvalidDecks { decks: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decks_must_be_positive() {
        assert!(DecksRemaining::new(2.0).is_ok());
        assert_eq!(
            DecksRemaining::new(0.0),
            Err(CountError::InvalidDecks { decks: 0.0 })
        );
        assert!(DecksRemaining::new(-1.5).is_err());
        assert!(DecksRemaining::new(f64::NAN).is_err());
        assert!(DecksRemaining::new(f64::INFINITY).is_err());
    }

    #[test]
    fn true_count_divides_by_decks() {
        let decks = DecksRemaining::new(2.0).expect("valid decks");
        let mut state = CountState::new(decks);
        assert_eq!(state.true_count(), 0.0);
        state.observe_all(&[Rank::Two, Rank::Three, Rank::Four]);
        assert_eq!(state.running_count(), 3);
        assert_eq!(state.true_count(), 1.5);
    }

    #[test]
    fn high_cards_push_count_down() {
        let decks = DecksRemaining::new(1.0).expect("valid decks");
        let mut state = CountState::with_running_count(1, decks);
        state.observe_all(&[Rank::Ace, Rank::King, Rank::Eight]);
        assert_eq!(state.running_count(), -1);
    }
}
