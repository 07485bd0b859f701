//! Healing channels and check outcomes fed to healing formulas

use serde::{Deserialize, Serialize};

use super::Wound;
use crate::formula::FormulaParams;

/// Which accumulator a healing tick reduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealChannel {
    Damage,
    Pain,
    Stun,
    /// Never heals on its own
    Shock,
}

impl HealChannel {
    pub fn all() -> [HealChannel; 4] {
        [
            HealChannel::Damage,
            HealChannel::Pain,
            HealChannel::Stun,
            HealChannel::Shock,
        ]
    }
}

/// How decisively a healing check went
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MajorFail,
    Fail,
    MinorFail,
    Neutral,
    MinorPass,
    Pass,
    MajorPass,
}

impl Outcome {
    /// Numeric degree handed to formulas as `outcome`
    pub fn degree(&self) -> f64 {
        match self {
            Outcome::MajorFail => -3.0,
            Outcome::Fail => -2.0,
            Outcome::MinorFail => -1.0,
            Outcome::Neutral => 0.0,
            Outcome::MinorPass => 1.0,
            Outcome::Pass => 2.0,
            Outcome::MajorPass => 3.0,
        }
    }

    pub fn is_success(&self) -> bool {
        *self > Outcome::Neutral
    }
}

/// Named parameters every healing formula sees
pub fn healing_params(wound: &Wound, outcome: Outcome) -> FormulaParams {
    FormulaParams::new()
        .with("original_damage", wound.original_damage)
        .with("damage", wound.current_damage)
        .with("pain", wound.current_pain)
        .with("stun", wound.current_stun)
        .with("shock", wound.current_shock)
        .with("outcome", outcome.degree())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BodypartId, EntityId, WoundId};
    use crate::damage::DamageType;
    use crate::wounds::{Harm, WoundKind};

    #[test]
    fn test_outcome_degrees_are_symmetric() {
        assert_eq!(Outcome::MajorFail.degree(), -Outcome::MajorPass.degree());
        assert_eq!(Outcome::Neutral.degree(), 0.0);
        assert!(Outcome::MinorPass.is_success());
        assert!(!Outcome::Neutral.is_success());
    }

    #[test]
    fn test_params_carry_wound_state() {
        let wound = Wound::new(
            WoundId(3),
            EntityId::new(),
            Some(BodypartId(2)),
            WoundKind::Organic,
            DamageType::Burning,
            Harm {
                damage: 12.0,
                pain: 6.0,
                stun: 1.0,
                shock: 0.0,
            },
        );
        let params = healing_params(&wound, Outcome::Pass);
        assert_eq!(params.get("original_damage"), Some(12.0));
        assert_eq!(params.get("pain"), Some(6.0));
        assert_eq!(params.get("outcome"), Some(2.0));
    }
}
