use core::fmt;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hit,
    Stand,
    DoubleDown,
}

impl Action {
    /// Single-letter actuator code.
    pub const fn code(self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::DoubleDown => "D",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Action::Hit => "Hit",
            Action::Stand => "Stand",
            Action::DoubleDown => "Double Down",
        };
        f.write_str(text)
    }
}

const DOUBLE_THRESHOLD: f64 = 2.0;

/// Fixed count-adjusted play table. Rules are checked top to bottom and the
/// first match wins, so the order below is load-bearing.
pub fn recommend_action(player_total: u8, dealer_up: u8, true_count: f64) -> Action {
    let double_or_hit = |allowed: bool| {
        if allowed && true_count >= DOUBLE_THRESHOLD {
            Action::DoubleDown
        } else {
            Action::Hit
        }
    };

    if player_total >= 17 {
        Action::Stand
    } else if player_total >= 13 && dealer_up <= 6 {
        Action::Stand
    } else if player_total == 12 && (4..=6).contains(&dealer_up) {
        Action::Stand
    } else if player_total == 11 {
        double_or_hit(true)
    } else if player_total == 10 {
        double_or_hit(dealer_up <= 9)
    } else if player_total == 9 && (3..=6).contains(&dealer_up) {
        double_or_hit(true)
    } else {
        Action::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, recommend_action};

    #[test]
    fn seventeen_and_up_always_stands() {
        assert_eq!(recommend_action(17, 11, -4.0), Action::Stand);
        assert_eq!(recommend_action(25, 10, 0.0), Action::Stand);
    }

    #[test]
    fn stiff_hands_stand_against_weak_dealer() {
        assert_eq!(recommend_action(13, 6, 0.0), Action::Stand);
        assert_eq!(recommend_action(16, 2, 0.0), Action::Stand);
        assert_eq!(recommend_action(16, 7, 0.0), Action::Hit);
    }

    #[test]
    fn twelve_stands_only_against_four_to_six() {
        assert_eq!(recommend_action(12, 6, 0.0), Action::Stand);
        assert_eq!(recommend_action(12, 4, 0.0), Action::Stand);
        assert_eq!(recommend_action(12, 3, 0.0), Action::Hit);
        assert_eq!(recommend_action(12, 7, 0.0), Action::Hit);
    }

    #[test]
    fn eleven_doubles_on_positive_count() {
        assert_eq!(recommend_action(11, 11, 2.0), Action::DoubleDown);
        assert_eq!(recommend_action(11, 5, 1.99), Action::Hit);
    }

    #[test]
    fn ten_doubles_unless_dealer_shows_ten_or_ace() {
        assert_eq!(recommend_action(10, 9, 2.5), Action::DoubleDown);
        assert_eq!(recommend_action(10, 10, 2.5), Action::Hit);
        assert_eq!(recommend_action(10, 11, 6.0), Action::Hit);
        assert_eq!(recommend_action(10, 9, 1.0), Action::Hit);
    }

    #[test]
    fn nine_doubles_against_three_to_six() {
        assert_eq!(recommend_action(9, 3, 2.0), Action::DoubleDown);
        assert_eq!(recommend_action(9, 6, 2.0), Action::DoubleDown);
        assert_eq!(recommend_action(9, 2, 2.0), Action::Hit);
        assert_eq!(recommend_action(9, 7, 2.0), Action::Hit);
        assert_eq!(recommend_action(9, 4, 0.5), Action::Hit);
    }

    #[test]
    fn low_totals_hit() {
        assert_eq!(recommend_action(8, 5, 9.0), Action::Hit);
        assert_eq!(recommend_action(4, 2, 0.0), Action::Hit);
    }

    #[test]
    fn codes_and_labels() {
        assert_eq!(Action::Hit.code(), "H");
        assert_eq!(Action::Stand.code(), "S");
        assert_eq!(Action::DoubleDown.code(), "D");
        assert_eq!(Action::DoubleDown.to_string(), "Double Down");
    }
}
