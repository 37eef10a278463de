use crate::model::rank::RankLabel;
use serde::Deserialize;

/// One detected card candidate from a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CardObservation {
    pub rank: RankLabel,
    pub match_distance: f64,
    pub centroid_y: f64,
}

impl CardObservation {
    pub fn new(rank: impl Into<RankLabel>, match_distance: f64, centroid_y: f64) -> Self {
        Self {
            rank: rank.into(),
            match_distance,
            centroid_y,
        }
    }

    /// Template-match quality mapped into `(0, 1]`; a perfect match scores 1.
    pub fn confidence(&self) -> f64 {
        1.0 / (self.match_distance.max(0.0) + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::CardObservation;
    use crate::model::rank::{Rank, RankLabel};

    #[test]
    fn confidence_falls_with_distance() {
        let exact = CardObservation::new(Rank::Five, 0.0, 100.0);
        let rough = CardObservation::new(Rank::Five, 3.0, 100.0);
        assert_eq!(exact.confidence(), 1.0);
        assert_eq!(rough.confidence(), 0.25);
    }

    #[test]
    fn negative_distance_is_clamped() {
        let odd = CardObservation::new(RankLabel::Unknown, -2.0, 0.0);
        assert_eq!(odd.confidence(), 1.0);
    }

    #[test]
    fn deserializes_classifier_record() {
        let obs: CardObservation = serde_json::from_str(
            r#"{"rank": "Queen", "match_distance": 1.0, "centroid_y": 88.5}"#,
        )
        .expect("parse observation");
        assert_eq!(obs.rank, RankLabel::Known(Rank::Queen));
        assert_eq!(obs.confidence(), 0.5);
    }
}
