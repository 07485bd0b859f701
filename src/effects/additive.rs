//! Foreign substances circulating in the blood

use serde::{Deserialize, Serialize};

use crate::anatomy::OrganKind;

/// What a blood additive does to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditiveConsequence {
    /// Water; harmless until the blood is flooded with it
    Hydrating,
    /// Saline and other volume expanders; counts toward blood volume
    BloodVolume,
    /// Poisons that kill tissue
    Harmful,
    /// Fast-acting poisons
    Deadly,
    /// Artificial blood; counts as volume but carries little oxygen
    BloodReplacement,
    /// Metabolic waste the kidneys failed to clear
    KidneyWaste,
}

impl AdditiveConsequence {
    /// Organ responsible for clearing this additive
    pub fn clearing_organ(&self) -> OrganKind {
        match self {
            AdditiveConsequence::Hydrating
            | AdditiveConsequence::BloodVolume
            | AdditiveConsequence::KidneyWaste => OrganKind::Kidney,
            AdditiveConsequence::Harmful | AdditiveConsequence::Deadly => OrganKind::Liver,
            AdditiveConsequence::BloodReplacement => OrganKind::Spleen,
        }
    }

    /// Does this additive add to circulating volume?
    pub fn expands_volume(&self) -> bool {
        matches!(
            self,
            AdditiveConsequence::BloodVolume | AdditiveConsequence::BloodReplacement
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodAdditive {
    pub consequence: AdditiveConsequence,
    /// Litres in circulation
    pub volume: f64,
}

impl BloodAdditive {
    /// Clear up to `amount` litres, returning what was actually removed
    pub fn clear(&mut self, amount: f64) -> f64 {
        let removed = amount.clamp(0.0, self.volume);
        self.volume -= removed;
        removed
    }

    pub fn is_spent(&self) -> bool {
        self.volume <= 0.0
    }
}
