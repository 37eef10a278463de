use blackjack_core::model::hand::ResolvedHand;

use super::ConfidenceTable;

/// Highest confidence seen for a rank, or `None` if it was never scored.
pub fn best_confidence(scores: &[f64]) -> Option<f64> {
    scores.iter().copied().reduce(f64::max)
}

/// Collapses a confidence table into one entry per observed rank.
///
/// Two physical cards of the same rank on one side resolve to a single rank;
/// the table cannot tell them apart.
pub fn resolve(table: &ConfidenceTable) -> ResolvedHand {
    table
        .iter()
        .filter_map(|(rank, scores)| best_confidence(scores).map(|_| rank))
        .collect()
}
