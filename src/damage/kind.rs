//! Damage types and their physiological properties
//!
//! Every property here is categorical. Strategies decide what to do with
//! them; the type itself only says what kind of harm it is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Slashing,
    Chopping,
    Crushing,
    Piercing,
    Ballistic,
    Burning,
    Freezing,
    Chemical,
    Shockwave,
    Bite,
    Claw,
    Electrical,
    /// Oxygen starvation, applied by the tick processor
    Hypoxia,
    /// Tissue die-off from toxins in the blood
    Cellular,
    Sonic,
    Shearing,
    ArmourPiercing,
    Wrenching,
    Shrapnel,
    Necrotic,
    Falling,
}

impl DamageType {
    /// Returns all damage types
    pub fn all() -> [DamageType; 21] {
        use DamageType::*;
        [
            Slashing, Chopping, Crushing, Piercing, Ballistic, Burning, Freezing, Chemical,
            Shockwave, Bite, Claw, Electrical, Hypoxia, Cellular, Sonic, Shearing,
            ArmourPiercing, Wrenching, Shrapnel, Necrotic, Falling,
        ]
    }

    /// Stable numeric code handed to formulas as the `type` parameter
    pub fn code(&self) -> f64 {
        Self::all()
            .iter()
            .position(|t| t == self)
            .map_or(0.0, |i| i as f64)
    }

    /// Can whatever caused this damage end up embedded in the wound?
    pub fn can_lodge(&self) -> bool {
        matches!(
            self,
            DamageType::Piercing
                | DamageType::Ballistic
                | DamageType::ArmourPiercing
                | DamageType::Shrapnel
                | DamageType::Bite
        )
    }

    /// Blunt trauma that can break bones
    pub fn is_blunt(&self) -> bool {
        matches!(
            self,
            DamageType::Crushing | DamageType::Shockwave | DamageType::Falling
        )
    }

    /// Only meaningful for living tissue; machines and objects ignore it
    pub fn living_tissue_only(&self) -> bool {
        matches!(
            self,
            DamageType::Hypoxia | DamageType::Cellular | DamageType::Necrotic
        )
    }

    /// Does a wound of this type open blood vessels?
    pub fn causes_bleeding(&self) -> bool {
        matches!(
            self,
            DamageType::Slashing
                | DamageType::Chopping
                | DamageType::Piercing
                | DamageType::Ballistic
                | DamageType::Bite
                | DamageType::Claw
                | DamageType::Shearing
                | DamageType::ArmourPiercing
                | DamageType::Shrapnel
                | DamageType::Wrenching
        )
    }

    /// Portion of the damage that is also dealt as shock
    pub fn shock_fraction(&self) -> f64 {
        match self {
            DamageType::Electrical => 1.0,
            DamageType::Sonic => 0.25,
            _ => 0.0,
        }
    }

    /// Accumulating types fold into one wound per location
    pub fn merges(&self) -> bool {
        matches!(self, DamageType::Hypoxia | DamageType::Cellular)
    }
}
