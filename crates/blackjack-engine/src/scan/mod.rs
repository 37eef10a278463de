mod resolve;

pub use resolve::{best_confidence, resolve};

use blackjack_core::model::observation::CardObservation;
use blackjack_core::model::rank::Rank;

/// Which half of the frame a card was seen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Dealer,
    Player,
}

/// Fixed horizontal split of the camera frame. Dealer cards sit above the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGeometry {
    frame_height: f64,
    dealer_split: f64,
}

impl ScanGeometry {
    pub const DEFAULT_SPLIT: f64 = 0.5;

    pub const fn new(frame_height: f64, dealer_split: f64) -> Self {
        Self {
            frame_height,
            dealer_split,
        }
    }

    pub const fn with_height(frame_height: f64) -> Self {
        Self::new(frame_height, Self::DEFAULT_SPLIT)
    }

    pub fn split_line(&self) -> f64 {
        self.frame_height * self.dealer_split
    }

    pub fn side_of(&self, centroid_y: f64) -> Side {
        if centroid_y < self.split_line() {
            Side::Dealer
        } else {
            Side::Player
        }
    }
}

/// Confidence scores per rank, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidenceTable {
    entries: Vec<(Rank, Vec<f64>)>,
}

impl ConfidenceTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, rank: Rank, confidence: f64) {
        match self.entries.iter_mut().find(|(seen, _)| *seen == rank) {
            Some((_, scores)) => scores.push(confidence),
            None => self.entries.push((rank, vec![confidence])),
        }
    }

    pub fn scores(&self, rank: Rank) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(seen, _)| *seen == rank)
            .map(|(_, scores)| scores.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, &[f64])> {
        self.entries
            .iter()
            .map(|(rank, scores)| (*rank, scores.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, scores)| scores.is_empty())
    }

    pub fn observation_count(&self) -> usize {
        self.entries.iter().map(|(_, scores)| scores.len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<(Rank, Vec<f64>)> for ConfidenceTable {
    fn from_iter<I: IntoIterator<Item = (Rank, Vec<f64>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Collects per-frame classifier output across one scan window.
#[derive(Debug, Clone)]
pub struct ConfidenceAggregator {
    geometry: ScanGeometry,
    dealer: ConfidenceTable,
    player: ConfidenceTable,
}

impl ConfidenceAggregator {
    pub fn new(geometry: ScanGeometry) -> Self {
        Self {
            geometry,
            dealer: ConfidenceTable::new(),
            player: ConfidenceTable::new(),
        }
    }

    pub fn geometry(&self) -> ScanGeometry {
        self.geometry
    }

    /// Folds one frame's detections into the tables. Unknown ranks are dropped.
    pub fn observe(&mut self, observations: &[CardObservation]) {
        for observation in observations {
            let Some(rank) = observation.rank.rank() else {
                continue;
            };
            let confidence = observation.confidence();
            match self.geometry.side_of(observation.centroid_y) {
                Side::Dealer => self.dealer.record(rank, confidence),
                Side::Player => self.player.record(rank, confidence),
            }
        }
    }

    pub fn table(&self, side: Side) -> &ConfidenceTable {
        match side {
            Side::Dealer => &self.dealer,
            Side::Player => &self.player,
        }
    }

    pub fn observation_count(&self) -> usize {
        self.dealer.observation_count() + self.player.observation_count()
    }

    pub fn reset(&mut self) {
        self.dealer.clear();
        self.player.clear();
    }

    /// Hands the finished tables over and leaves the aggregator empty.
    pub fn take(&mut self) -> (ConfidenceTable, ConfidenceTable) {
        (
            std::mem::take(&mut self.dealer),
            std::mem::take(&mut self.player),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::model::rank::RankLabel;

    fn aggregator() -> ConfidenceAggregator {
        ConfidenceAggregator::new(ScanGeometry::with_height(720.0))
    }

    #[test]
    fn splits_on_frame_midline() {
        let geometry = ScanGeometry::with_height(720.0);
        assert_eq!(geometry.side_of(359.9), Side::Dealer);
        assert_eq!(geometry.side_of(360.0), Side::Player);
        let skewed = ScanGeometry::new(720.0, 0.25);
        assert_eq!(skewed.side_of(200.0), Side::Player);
    }

    #[test]
    fn observations_land_on_their_side() {
        let mut agg = aggregator();
        agg.observe(&[
            CardObservation::new(Rank::Nine, 1.0, 100.0),
            CardObservation::new(Rank::Ten, 0.0, 600.0),
            CardObservation::new(Rank::Six, 3.0, 650.0),
        ]);
        assert_eq!(agg.table(Side::Dealer).scores(Rank::Nine), Some(&[0.5][..]));
        assert_eq!(agg.table(Side::Player).scores(Rank::Ten), Some(&[1.0][..]));
        assert_eq!(agg.table(Side::Player).scores(Rank::Six), Some(&[0.25][..]));
        assert_eq!(agg.table(Side::Dealer).scores(Rank::Ten), None);
    }

    #[test]
    fn unknown_and_empty_frames_are_ignored() {
        let mut agg = aggregator();
        agg.observe(&[]);
        agg.observe(&[CardObservation::new(RankLabel::Unknown, 0.0, 10.0)]);
        assert!(agg.table(Side::Dealer).is_empty());
        assert!(agg.table(Side::Player).is_empty());
    }

    #[test]
    fn repeated_ranks_accumulate_in_order() {
        let mut agg = aggregator();
        for distance in [1.0, 0.0, 3.0] {
            agg.observe(&[CardObservation::new(Rank::Five, distance, 500.0)]);
        }
        let scores = agg.table(Side::Player).scores(Rank::Five).expect("fives");
        assert_eq!(scores, &[0.5, 1.0, 0.25]);
        assert_eq!(agg.table(Side::Player).observation_count(), 3);
    }

    #[test]
    fn take_leaves_tables_empty() {
        let mut agg = aggregator();
        agg.observe(&[CardObservation::new(Rank::Ace, 0.5, 10.0)]);
        let (dealer, player) = agg.take();
        assert!(!dealer.is_empty());
        assert!(player.is_empty());
        assert!(agg.table(Side::Dealer).is_empty());
    }
}
