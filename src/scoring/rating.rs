//! Qualitative rating labels for a final score

use serde::{Serialize, Serializer};
use std::fmt;

/// Nine ordered rating bands, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Beginner,
    Developing,
    Promising,
    Good,
    Strong,
    VeryGood,
    Excellent,
    Exceptional,
    Outstanding,
}

/// Lower bound of each band, highest first
const THRESHOLDS: &[(f64, Rating)] = &[
    (0.9, Rating::Outstanding),
    (0.8, Rating::Exceptional),
    (0.7, Rating::Excellent),
    (0.6, Rating::VeryGood),
    (0.5, Rating::Strong),
    (0.4, Rating::Good),
    (0.3, Rating::Promising),
    (0.2, Rating::Developing),
];

impl Rating {
    pub fn from_score(score: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, rating)| *rating)
            .unwrap_or(Rating::Beginner)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Outstanding => "Outstanding Contributor",
            Rating::Exceptional => "Exceptional Developer",
            Rating::Excellent => "Excellent Developer",
            Rating::VeryGood => "Very Good Developer",
            Rating::Strong => "Strong Developer",
            Rating::Good => "Good Developer",
            Rating::Promising => "Promising Developer",
            Rating::Developing => "Developing Contributor",
            Rating::Beginner => "Beginner",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
