//! Wound severity tiers and the ranked tables that classify damage

pub mod table;

use serde::{Deserialize, Serialize};

pub use table::{parse_range, SeverityRange, SeverityTable};

/// Wound severity categories, ordered from harmless to catastrophic
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    /// No wound
    None,
    /// Cosmetic only
    Superficial,
    /// Painful but functional
    Minor,
    /// Starts to bleed
    Small,
    Moderate,
    /// Impaired function, heavy bleeding
    Severe,
    VerySevere,
    /// Limb or organ barely holding together
    Grievous,
    /// Limb gone / organ destroyed
    Horrifying,
}

impl SeverityTier {
    /// Returns all tiers in ascending order
    pub fn all() -> [SeverityTier; 9] {
        [
            SeverityTier::None,
            SeverityTier::Superficial,
            SeverityTier::Minor,
            SeverityTier::Small,
            SeverityTier::Moderate,
            SeverityTier::Severe,
            SeverityTier::VerySevere,
            SeverityTier::Grievous,
            SeverityTier::Horrifying,
        ]
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SeverityTier::None => "unharmed",
            SeverityTier::Superficial => "superficial",
            SeverityTier::Minor => "minor",
            SeverityTier::Small => "small",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Severe => "severe",
            SeverityTier::VerySevere => "very severe",
            SeverityTier::Grievous => "grievous",
            SeverityTier::Horrifying => "horrifying",
        }
    }
}
