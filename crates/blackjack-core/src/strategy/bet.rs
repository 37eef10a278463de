use core::fmt;
use serde::Serialize;

/// Bet spread keyed off the true count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BetUnits {
    One = 1,
    Two = 2,
    Three = 3,
    Five = 5,
}

impl BetUnits {
    pub fn from_true_count(true_count: f64) -> Self {
        if true_count <= 1.0 {
            BetUnits::One
        } else if true_count <= 3.0 {
            BetUnits::Two
        } else if true_count <= 5.0 {
            BetUnits::Three
        } else {
            BetUnits::Five
        }
    }

    pub const fn units(self) -> u8 {
        self as u8
    }

    /// Three-digit binary code relayed to the actuator ("001", "101", ...).
    pub fn binary_code(self) -> String {
        format!("{:03b}", self.units())
    }
}

impl fmt::Display for BetUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units())
    }
}

impl Serialize for BetUnits {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.units())
    }
}
