//! Per-strategy thresholds with documented defaults
//!
//! These cut-offs decide when accumulated state turns into a lifecycle
//! verdict. They are loaded from an optional `[thresholds]` table in each
//! strategy file; anything left out falls back to the defaults below.

use serde::{Deserialize, Serialize};

/// Numeric cut-offs used by the status evaluator and the tick processor
///
/// The condition reporter reads the same values so that prose and verdicts
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    // === INJURY ===
    /// Fraction of maximum hit points at which an entity counts as
    /// critically injured
    ///
    /// Only used for `is_critically_injured`, which other systems use to
    /// decide things like whether an NPC flees. Does not affect verdicts.
    pub critical_injury_ratio: f64,

    /// Multiplier applied to maximum hit points before the lethal check
    ///
    /// At 1.0 an entity dies the moment accumulated damage reaches max HP.
    /// Constructs and robots commonly use a little slack (1.1-1.25) so a
    /// final blow that lands exactly on max HP leaves a wreck standing.
    pub max_hp_grace: f64,

    // === CIRCULATION ===
    /// Blood ratio at or below which an organic entity is dead
    ///
    /// Ratio is effective blood volume over capacity. 0.5 means losing half
    /// of all blood is fatal regardless of anything else.
    pub blood_death_ratio: f64,

    /// Blood ratio below which blood loss starts causing hypoxia
    ///
    /// Must be above `blood_death_ratio`, otherwise entities die before any
    /// hypoxia is felt.
    pub hypoxia_blood_ratio: f64,

    /// Fraction of capacity that blood-replacement fluid may occupy before
    /// it starts starving tissue of oxygen
    pub replacement_hypoxia_ratio: f64,

    /// Fraction of capacity that hydrating additives may occupy before the
    /// entity suffers water intoxication
    pub hydration_hypoxia_ratio: f64,

    /// Hydraulic fluid ratio at or below which a robot locks up (Paralyzed)
    pub hydraulic_paralysis_ratio: f64,

    // === DRUGS ===
    /// Anesthetic intensity above which the entity is rendered unconscious
    pub anesthesia_unconscious: f64,

    /// Anesthetic intensity above which the dose is lethal
    pub anesthesia_lethal: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_injury_ratio: 0.9,
            max_hp_grace: 1.0,

            blood_death_ratio: 0.5,
            hypoxia_blood_ratio: 0.6,
            replacement_hypoxia_ratio: 0.4,
            hydration_hypoxia_ratio: 0.15,
            hydraulic_paralysis_ratio: 0.25,

            anesthesia_unconscious: 2.0,
            anesthesia_lethal: 50.0,
        }
    }
}

impl Thresholds {
    /// Validate thresholds for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        let ratios = [
            ("critical_injury_ratio", self.critical_injury_ratio),
            ("blood_death_ratio", self.blood_death_ratio),
            ("hypoxia_blood_ratio", self.hypoxia_blood_ratio),
            ("replacement_hypoxia_ratio", self.replacement_hypoxia_ratio),
            ("hydration_hypoxia_ratio", self.hydration_hypoxia_ratio),
            ("hydraulic_paralysis_ratio", self.hydraulic_paralysis_ratio),
        ];
        for (name, value) in ratios {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(format!("{} ({}) must be within (0, 1]", name, value));
            }
        }

        if !(self.max_hp_grace.is_finite() && self.max_hp_grace > 0.0) {
            return Err(format!(
                "max_hp_grace ({}) must be positive",
                self.max_hp_grace
            ));
        }

        if self.hypoxia_blood_ratio <= self.blood_death_ratio {
            return Err(format!(
                "hypoxia_blood_ratio ({}) should be > blood_death_ratio ({})",
                self.hypoxia_blood_ratio, self.blood_death_ratio
            ));
        }

        if self.anesthesia_unconscious >= self.anesthesia_lethal {
            return Err(format!(
                "anesthesia_unconscious ({}) should be < anesthesia_lethal ({})",
                self.anesthesia_unconscious, self.anesthesia_lethal
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
    }

    #[test]
    fn test_hypoxia_must_precede_death() {
        let thresholds = Thresholds {
            hypoxia_blood_ratio: 0.4,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_anesthesia_cutoffs_ordered() {
        let thresholds = Thresholds {
            anesthesia_unconscious: 60.0,
            ..Thresholds::default()
        };
        let err = thresholds.validate().unwrap_err();
        assert!(err.contains("anesthesia_unconscious"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let thresholds: Thresholds = toml::from_str("blood_death_ratio = 0.4").unwrap();
        assert_eq!(thresholds.blood_death_ratio, 0.4);
        assert_eq!(thresholds.anesthesia_lethal, 50.0);
    }
}
