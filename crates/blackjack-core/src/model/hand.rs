use crate::model::rank::Rank;
use core::fmt;
use serde::Serialize;

/// Ranks read off one side of the table after a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedHand {
    ranks: Vec<Rank>,
}

impl ResolvedHand {
    pub fn new() -> Self {
        Self { ranks: Vec::new() }
    }

    pub fn with_ranks(ranks: Vec<Rank>) -> Self {
        Self { ranks }
    }

    pub fn add(&mut self, rank: Rank) {
        self.ranks.push(rank);
    }

    pub fn contains(&self, rank: Rank) -> bool {
        self.ranks.contains(&rank)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rank> {
        self.ranks.iter()
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// First resolved rank; the only dealer card the strategy consults.
    pub fn up_card(&self) -> Option<Rank> {
        self.ranks.first().copied()
    }

    /// Blackjack total. Aces start at 11 and drop to 1, one at a time, while
    /// the hand would otherwise bust.
    pub fn total(&self) -> u8 {
        let mut total: u32 = self.ranks.iter().map(|rank| u32::from(rank.points())).sum();
        let mut soft_aces = self.ranks.iter().filter(|rank| rank.is_ace()).count();
        while total > 21 && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        u8::try_from(total).unwrap_or(u8::MAX)
    }

    pub fn hi_lo(&self) -> i32 {
        self.ranks.iter().map(|rank| rank.hi_lo()).sum()
    }

    /// Ranks in ascending order, for display.
    pub fn sorted(&self) -> Vec<Rank> {
        let mut ranks = self.ranks.clone();
        ranks.sort();
        ranks
    }
}

impl FromIterator<Rank> for ResolvedHand {
    fn from_iter<I: IntoIterator<Item = Rank>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ResolvedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rank) in self.sorted().iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{rank}")?;
        }
        Ok(())
    }
}
